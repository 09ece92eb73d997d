// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Replay a recorded or synthetic drive through the traffic light detector

use anyhow::{bail, Context, Error};
use argh::FromArgs;
use log::{debug, info, LevelFilter};
use scenario::Scenario;
use std::path::PathBuf;
use tl_detector::prelude::*;

/// Classifier misreading colors at random
mod noise;
/// Scenario files and the synthetic drive
mod scenario;

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help", "help"))]
/// Replay arguments
struct Args {
    #[argh(
        description = "detector configuration (json); without a scenario it must \
                       keep the two stop lines of the synthetic drive"
    )]
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(description = "scenario to replay (json), defaults to a synthetic drive")]
    #[argh(option, short = 's')]
    scenario: Option<PathBuf>,

    #[argh(description = "log level")]
    #[argh(option, short = 'l')]
    log_level: Option<LevelFilter>,

    #[argh(description = "print tracing spans")]
    #[argh(switch, short = 't')]
    trace: bool,

    #[argh(description = "probability of a misread light color")]
    #[argh(option, short = 'n', default = "0.0")]
    noise: f64,

    #[argh(description = "seed of the misreading generator")]
    #[argh(option)]
    seed: Option<u64>,
}

fn main() -> Result<(), Error> {
    let Args {
        config,
        scenario,
        log_level,
        trace,
        noise,
        seed,
    } = argh::from_env();

    tl_logger::init(log_level.unwrap_or(LevelFilter::Warn), true);
    if trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    if !(0.0..=1.0).contains(&noise) {
        bail!("noise must be within 0.0 and 1.0, got {noise}");
    }

    let config = match config {
        Some(path) => DetectorConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration {path:?}"))?,
        None => DetectorConfig::new(scenario::synthetic_stop_lines()),
    };
    let scenario = match scenario {
        Some(path) => Scenario::from_file(&path)?,
        None => {
            check_synthetic(&config)?;
            Scenario::synthetic()
        }
    };
    info!("Replaying {} events", scenario.events.len());

    let classifier = noise::NoisyClassifier::new(GroundTruthClassifier, noise, seed);
    let pipeline = pipeline::Builder::default()
        .config(config)
        .classifier(classifier)
        .build()
        .context("failed to build detector")?;

    let (mut events, events_receiver) = signalling::channel();
    let (output_sender, mut output) = signalling::channel();
    let runner = Runner::spawn(pipeline, events_receiver, output_sender)?;

    for event in scenario.into_events() {
        // The runner only hangs up on a fatal error, reported on join
        if events.send(event).is_err() {
            break;
        }
    }
    // Ignore a hung up runner here as well
    let _ = events.send(Event::Shutdown);
    drop(events);

    let mut published = 0usize;
    let mut red = 0usize;
    while let Ok(Published {
        timestamp,
        waypoint,
    }) = output.recv()
    {
        println!("{timestamp} {}", waypoint.as_i32());
        published += 1;
        if waypoint.0.is_some() {
            red += 1;
        }
    }

    let pipeline = runner.join().context("detector failed")?;
    debug!("Final debounce state: {:?}", pipeline.debouncer());
    info!("Published {published} waypoints, {red} of them at a red light");
    Ok(())
}

/// The synthetic drive reports one light per synthetic stop line
fn check_synthetic(config: &DetectorConfig) -> Result<(), Error> {
    let expected = scenario::synthetic_stop_lines().len();
    let configured = config.stop_line_positions.len();
    if configured != expected {
        bail!(
            "the synthetic drive has {expected} stop lines, the configuration {configured}; \
             pass a scenario matching the configuration"
        );
    }
    Ok(())
}
