use landing_assist::{
    Field, GaugeCommand, LandingAssist, LandingAssistConfig, SimulatedFeed,
};
use std::env;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse --radius min max and --title from the command line
    let mut min_radius = 50.0;
    let mut max_radius = 2000.0;
    let mut window_title = "Landing Assist".to_string();
    let mut args = env::args().peekable();
    while let Some(arg) = args.next() {
        if arg == "--radius" {
            if let (Some(min), Some(max)) = (args.next(), args.next()) {
                if let (Ok(min), Ok(max)) = (min.parse::<f64>(), max.parse::<f64>()) {
                    min_radius = min.min(max);
                    max_radius = min.max(max);
                }
            }
        } else if arg == "--title" {
            if let Some(title) = args.next() {
                window_title = title;
            }
        }
    }

    let config = LandingAssistConfig::builder()
        .title(window_title)
        .min_radius(min_radius)
        .max_radius(max_radius)
        .build();
    let mut widget = LandingAssist::new(config);

    // Simulated approach ramp at the telemetry cadence; the window loop
    // drains the channel once per frame.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut feed = SimulatedFeed::new();
        loop {
            let sample = feed.next_sample();
            for (field, value) in sample.fields() {
                if sender.send(GaugeCommand::Telemetry(field, value)).is_err() {
                    return;
                }
            }
            thread::sleep(landing_assist::telemetry::FEED_INTERVAL);
        }
    });

    widget.show_with_commands(receiver)
}
