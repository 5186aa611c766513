//! A basic example showing minimal usage
//!
//! We construct a [`WindowTracker`], stream data through it, and read out the median of every window

use windowed_median::WindowTracker;

/// Some sample data to track the median of
///
/// In practice, this will probably be a much longer stream
const DATA: [f32; 15] = [
    18.6, 83.1, 21.5, 21.4, 63.4, 64.1, 4.6, 92.7, 31.1, 94.8, 2.4, 44.5, 70.0, 17.1, 61.0,
];

fn main() -> Result<(), windowed_median::WindowError> {
    // Track the median of the five most recent values
    let mut tracker = WindowTracker::new(5)?;

    // Feed data points from our data source into the tracker
    // Medians start coming out once the first five values are in
    for data_point in DATA {
        if let Some(median) = tracker.push(data_point) {
            println!("Window median: {median}");
        }
    }

    Ok(())
}
