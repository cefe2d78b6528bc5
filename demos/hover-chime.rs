// Copyright (c) 2024 Mike Tsao

//! The `hover-chime` demo builds a small menu in a [ToyDocument] whose items
//! chime while hovered, then sweeps a pretend pointer across it and reports
//! what the system did.

use clap::Parser;
use cssa::{prelude::*, style::ElementIdentity, toys::*};
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Number of menu items
    #[clap(short = 'n', long, default_value_t = 3)]
    items: usize,

    /// The `loop` value each item declares while hovered
    #[clap(short = 'l', long, default_value = "2")]
    loops: String,

    /// The `trigger-mode` each item declares while hovered
    #[clap(short = 't', long, default_value = "continue")]
    trigger_mode: String,

    /// JSON file with settings
    #[clap(short = 's', long)]
    settings: Option<std::path::PathBuf>,

    /// Enable debug mode
    #[clap(short = 'd', long, value_parser)]
    debug: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.version {
        eprintln!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let settings = match args.settings {
        Some(path) => CssaSettings::from_json_str(&std::fs::read_to_string(path)?)?,
        None => CssaSettings::default(),
    };

    // A menu of items that are silent until hovered.
    let mut document = ToyDocument::default();
    let menu = document.create_element(document.root(), ElementIdentity::new_with("nav"));
    let items: Vec<ElementUid> = (0..args.items)
        .map(|i| {
            let item = document.create_element(
                menu,
                ElementIdentity::new_with("a").id(&format!("item-{i}")),
            );
            document.declare(item, PropertyName::Source, &format!("url('chime-{i}.ogg')"));
            document.declare(item, PropertyName::State, "stopped");
            document.declare(item, PropertyName::PlaybackMode, "stop");
            for (name, value) in [
                (PropertyName::State, "playing"),
                (PropertyName::Loop, args.loops.as_str()),
                (PropertyName::TriggerMode, args.trigger_mode.as_str()),
            ] {
                document.declare_when(item, PseudoState::Hover, name, value);
            }
            item
        })
        .collect();

    let engine = ToyPlaybackEngine::default();
    let mut conductor = Conductor::new_with(settings, engine.clone());
    conductor.start(&document);
    report(&conductor);

    // The pointer rests on each item for a while, then moves on.
    let tick = Duration::from_millis(250);
    for item in items {
        document.set_state(item, PseudoState::Hover, true);
        conductor.handle_input(&document, CssaInput::Interaction(item, Interaction::HoverEnter));
        for _ in 0..8 {
            for key in engine.advance(tick) {
                conductor.handle_input(&document, CssaInput::PlaybackEnded(key));
            }
            conductor.handle_input(&document, CssaInput::EndTurn);
        }
        println!("{item}: {} voice(s) playing", engine.playing_count());
        document.set_state(item, PseudoState::Hover, false);
        conductor.handle_input(&document, CssaInput::Interaction(item, Interaction::HoverExit));
        report(&conductor);
    }
    Ok(())
}

fn report(conductor: &Conductor<ToyPlaybackEngine>) {
    for event in conductor.receiver().try_iter() {
        println!("{event:?}");
    }
}
