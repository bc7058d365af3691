//! Headless battle driver.
//!
//! Plays one battle against a generated opponent with a simple autopilot and
//! prints the battle log.

use clap::Parser;
use creature_battle::{
    BalanceConfig, BaseStats, BattleEngine, BattleOutcome, BattlePhase, Creature, Element, HealAmount, Item,
    ItemEffect, OpponentDescriptor, Roster, RosterStore, TurnRng,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Turn-based creature battle simulator
#[derive(Parser, Debug)]
#[command(name = "creature-battle")]
#[command(about = "Play one creature battle headlessly")]
#[command(version)]
struct Args {
    /// Seed for the battle's random rolls; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Opponent element
    #[arg(long, default_value = "normal")]
    element: String,

    /// Opponent level
    #[arg(long, default_value_t = 5)]
    level: u8,

    /// Make the opponent a boss
    #[arg(long)]
    boss: bool,

    /// Roster JSON file; a starter roster is used when omitted
    #[arg(long, value_name = "ROSTER_FILE")]
    roster: Option<PathBuf>,

    /// Balance config RON file
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Print the outcome and final roster as JSON
    #[arg(long)]
    json: bool,

    /// Log engine transitions and rolls to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Safety cap on the number of player actions
    #[arg(long, default_value_t = 200)]
    max_turns: u32,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => BalanceConfig::load(path).map_err(|e| e.to_string())?,
        None => BalanceConfig::default(),
    };
    let mut roster = match &args.roster {
        Some(path) => Roster::load(path).map_err(|e| e.to_string())?,
        None => starter_roster(config.roster_size()).map_err(|e| e.to_string())?,
    };

    let rng = args.seed.map_or_else(TurnRng::new_random, TurnRng::from_seed);
    let mut engine = BattleEngine::new(config, rng);

    let mut opponent = OpponentDescriptor::new(
        format!("Wild {}", capitalize(&args.element)),
        Element::from_name_or_normal(&args.element),
        args.level,
    );
    if args.boss {
        opponent = opponent.boss();
    }

    let outcome = autoplay(&mut engine, &mut roster, &opponent, args.max_turns).map_err(|e| e.to_string())?;

    if args.json {
        let report = serde_json::json!({ "outcome": outcome, "roster": roster });
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        println!(
            "{:?}: +{} XP, +{} coins",
            outcome.outcome, outcome.xp_gained, outcome.currency_gained
        );
        if let Some(report) = outcome.level_up.filter(|r| r.levels_gained() > 0) {
            println!("Level {} -> {}", report.old_level, report.new_level);
        }
    }
    Ok(())
}

/// Attack every turn, heal when low, replace fainted creatures with the first conscious one.
fn autoplay(
    engine: &mut BattleEngine,
    roster: &mut Roster,
    opponent: &OpponentDescriptor,
    max_turns: u32,
) -> creature_battle::BattleResult<BattleOutcome> {
    engine.start_battle(&*roster, opponent)?;
    let mut printed = 0;
    let mut actions = 0;

    while !engine.phase().is_terminal() {
        match engine.phase() {
            BattlePhase::SelectCreature | BattlePhase::ChangingCreature => {
                let next = first_conscious(engine).ok_or(creature_battle::ActionError::NoUsableCreature)?;
                engine.select_creature(&next)?;
            }
            BattlePhase::PlayerTurn if actions >= max_turns => engine.flee()?,
            BattlePhase::PlayerTurn => {
                actions += 1;
                if needs_healing(engine) && engine.use_item(&mut *roster, "potion", None).is_ok() {
                    continue;
                }
                engine.attack(None)?;
            }
            _ => {
                if !engine.advance() {
                    break;
                }
            }
        }

        let log = engine.log();
        for line in &log[printed..] {
            println!("{}", line);
        }
        printed = log.len();
    }

    engine.end_battle(&mut *roster)
}

fn first_conscious(engine: &BattleEngine) -> Option<String> {
    engine
        .state()?
        .roster
        .iter()
        .find(|c| !c.is_fainted())
        .map(|c| c.id.clone())
}

fn needs_healing(engine: &BattleEngine) -> bool {
    engine
        .state()
        .and_then(|state| state.active_creature())
        .is_some_and(|c| (c.current_hp() as u32) * 3 < c.max_hp() as u32)
}

fn starter_roster(capacity: usize) -> creature_battle::RosterResult<Roster> {
    let mut roster = Roster::new(capacity);
    let starters = [
        ("sprout", "Sprout", Element::Grass),
        ("cinder", "Cinder", Element::Fire),
        ("ripple", "Ripple", Element::Water),
    ];
    for (id, name, element) in starters {
        roster.add_creature(Creature::new(
            id,
            name,
            element,
            5,
            BaseStats { max_hp: 50, attack: 20, defense: 12, speed: 15 },
        ))?;
    }
    roster.add_item(Item::new("potion", "Potion", ItemEffect::Heal(HealAmount::Flat(20)), 3).with_price(50));
    roster.update_currency(100);
    Ok(roster)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.map(|c| c.to_ascii_lowercase())).collect(),
        None => String::new(),
    }
}
