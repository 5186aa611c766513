//! A more fully-fledged example, showcasing runtime configuration and other methods on [`WindowTracker`]

use windowed_median::{Structure, TrackerConfig, TrackerState};

/// Some sample data to track the median of
///
/// In practice, this will probably be a much longer stream
const DATA: [f32; 15] = [
    18.6, 83.1, 21.5, 21.4, 63.4, 64.1, 4.6, 92.7, 31.1, 94.8, 2.4, 44.5, 70.0, 17.1, 61.0,
];

fn main() -> Result<(), windowed_median::WindowError> {
    // Construct a tracker over windows of four values, backed by the sorted multiset
    // Even windows report the average of the two middle values
    let mut tracker = TrackerConfig::new(4)
        .structure(Structure::SortedMultiset)
        .build::<f32>()?;

    for data_point in DATA {
        let median = tracker.push(data_point);

        // While filling, nothing is reported
        match (tracker.state(), median) {
            (TrackerState::Filling, _) => {
                println!("Window is filling: {}/{}", tracker.len(), tracker.window_size())
            }
            (TrackerState::Sliding, Some(median)) => {
                let window: Vec<f32> = tracker.window().collect();
                println!("Median of {window:?} is {median}");
            }
            (TrackerState::Sliding, None) => unreachable!("a full window always has a median"),
        }
    }

    // As we go, we can check the total number of points processed
    println!("Processed {} data points", tracker.seen());

    // The current median can be read again without pushing anything
    println!("Final median: {:?}", tracker.median());

    // A whole slice can also be processed in one go
    let medians = windowed_median::process(&DATA, 4)?;
    println!("Batch medians: {medians:?}");

    Ok(())
}
