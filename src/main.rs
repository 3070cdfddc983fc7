use clap::Parser;
use env_logger::Env;
use log::{error, info};

use chordspell::parser::{chord_spec, note_spec, parse_complete, parse_mode};
use chordspell::pitch::semitone_to_key;
use chordspell::render::{schedule, Effect};
use chordspell::{
    all_chords, scale, Catalog, ChordEvent, Config, Error, NoteCollection, Progression,
    SoxCommand, SpellingTable,
};

mod cli;
use cli::{Cli, Commands, SoxArgs};

fn load_config(cli: &Cli) -> Result<Config, Error> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = match cli.reference_pitch {
        Some(pitch) => config.with_reference_pitch(pitch),
        None => config,
    };
    config.validate()?;
    Ok(config)
}

fn print_collection(collection: &NoteCollection, reference: f64) -> Result<(), Error> {
    println!("{}", collection);
    for note in collection.notes() {
        println!("    {:<6} {:>9.3} Hz", note.to_string(), note.frequency(reference)?);
    }
    Ok(())
}

fn show_note(table: &SpellingTable, config: &Config, raw: &str) -> Result<(), Error> {
    let note = note_spec(raw)?.resolve(table)?;
    println!(
        "{}: semitone {}, key {}, {:.3} Hz",
        note,
        note.semitone(),
        semitone_to_key(note.semitone())?,
        note.frequency(config.reference_pitch)?
    );
    let spellings: Vec<String> = table.spellings(note.semitone()).map(|n| n.to_string()).collect();
    println!("spellings: {}", spellings.join(" "));
    println!("canonical: {}", table.canonical(note.semitone())?);
    Ok(())
}

fn show_scale(
    table: &SpellingTable,
    catalog: &Catalog,
    config: &Config,
    root: &str,
    name: &str,
) -> Result<(), Error> {
    let pattern = catalog
        .scale(name)
        .ok_or_else(|| Error::UnknownScale(name.to_owned()))?;
    let root = note_spec(root)?.resolve(table)?;
    print_collection(&scale(table, root, pattern)?, config.reference_pitch)
}

fn show_progression(table: &SpellingTable, config: &Config, root: &str, mode: &str) -> Result<(), Error> {
    let mode = parse_complete(mode, parse_mode)?;
    let root = note_spec(root)?.resolve(table)?;
    let progression = Progression::diatonic(table, root, mode)?;
    println!("{}", progression);
    for (chord, quality) in progression.chords().iter().zip(progression.qualities().iter()) {
        print!("{:<4} ", quality.to_string());
        print_collection(chord, config.reference_pitch)?;
    }
    Ok(())
}

fn show_all_chords(table: &SpellingTable, catalog: &Catalog, octave: u8) {
    let mut failed = 0;
    for built in all_chords(table, catalog, octave) {
        match built {
            Ok(chord) => println!("{}", chord),
            Err(e) => {
                failed += 1;
                error!("{}", e);
            }
        }
    }
    if failed > 0 {
        info!("{} chords could not be spelled.", failed);
    }
}

fn show_table(table: &SpellingTable) {
    for (semitone, letter, note) in table.entries() {
        println!("{:>2} {:?} {}", semitone, letter, note);
    }
}

fn show_sox(table: &SpellingTable, catalog: &Catalog, config: &Config, args: &SoxArgs) -> Result<(), Error> {
    let mut events = Vec::with_capacity(args.symbols.len());
    for symbol in &args.symbols {
        let chord = chord_spec(symbol)?.build(table, catalog)?;
        let event = ChordEvent::new(chord.notes().to_vec())
            .with_duration(args.duration)
            .with_delay_per_note(args.delay_per_note)
            .with_freq_shift(args.freq_shift);
        events.push(event);
    }
    let voices = schedule(&events, config.reference_pitch)?;
    let length = args.duration * events.len() as f64;
    let command = SoxCommand::new(voices)
        .sample_rate(args.sample_rate)?
        .bits(args.bits)?
        .channels(args.channels)?
        .output(args.output.as_str())
        .effect(Effect::Fade {
            fade_in: 0.0,
            length,
            fade_out: args.fade,
        })
        .effect(Effect::Norm(args.norm));
    println!("{}", command.build()?.join(" "));
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let table = SpellingTable::build(&config)?;
    let catalog = Catalog::standard();
    info!(
        "Spelling table: {} entries, octaves {:?}, up to {} accidentals",
        table.len(),
        table.octave_range(),
        table.accidental_limit()
    );

    match &cli.command {
        Commands::Note { note } => show_note(&table, &config, note),
        Commands::Chord { symbol } => {
            let chord = chord_spec(symbol)?.build(&table, &catalog)?;
            print_collection(&chord, config.reference_pitch)
        }
        Commands::Scale { root, scale } => show_scale(&table, &catalog, &config, root, &scale.join(" ")),
        Commands::Progression { root, mode } => show_progression(&table, &config, root, mode),
        Commands::Chords { octave } => {
            show_all_chords(&table, &catalog, *octave);
            Ok(())
        }
        Commands::Table => {
            show_table(&table);
            Ok(())
        }
        Commands::Sox(args) => show_sox(&table, &catalog, &config, args),
    }
}
