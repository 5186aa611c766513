//! An example showcasing medians over an integer stream, fed through the iterator adapter

use windowed_median::MedianExt;

/// Request latencies in microseconds
///
/// Note that the spike at the ninth sample barely moves the median
const LATENCIES_US: [u64; 15] = [
    120, 135, 128, 140, 131, 125, 138, 129, 9_500, 133, 127, 136, 130, 124, 139,
];

fn main() -> Result<(), windowed_median::WindowError> {
    // Integers go in, and medians come out as f64, since an even window can average to a fraction
    for (i, median) in LATENCIES_US.sliding_medians(6)?.enumerate() {
        println!("Samples {}..{}: median latency {median}us", i, i + 6);
    }

    Ok(())
}
