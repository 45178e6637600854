mod http;

use chrono::{Local, NaiveTime, Timelike, Utc};
use clap::{Parser, Subcommand};
use haven_core::chat::{ChatRole, ChatSession};
use haven_core::journal;
use haven_core::schedule::active_schedules;
use haven_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "haven")]
#[command(about = "PTSD self-help companion: coping techniques, journal and reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest coping techniques for how you are feeling
    Suggest {
        /// Describe what is going on
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's reminder (default)
    Reminder {
        /// Pick a random reminder instead of today's
        #[arg(long)]
        random: bool,
    },

    /// Browse the technique catalog
    Techniques {
        /// Only show one category (e.g. grounding, distress-tolerance)
        #[arg(long)]
        category: Option<TechniqueCategory>,
    },

    /// Talk with the chat assistant
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },

    /// Mood journal
    Mood {
        #[command(subcommand)]
        action: MoodAction,
    },

    /// Technique usage journal
    Technique {
        #[command(subcommand)]
        action: TechniqueAction,
    },

    /// Mood trend and most used techniques
    Progress {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Personal safety plan
    SafetyPlan {
        #[command(subcommand)]
        action: SafetyPlanAction,
    },

    /// Crisis lines
    Crisis,

    /// Reminder schedule and next fire times
    Schedule,

    /// Medication reminders
    Medication {
        #[command(subcommand)]
        action: MedicationAction,
    },

    /// App preferences
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },

    /// Delete all stored journal data
    ClearData {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send a message, continuing the stored conversation
    Send {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Show the stored conversation
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum MoodAction {
    /// Record how you feel (1-5 or terrible, poor, okay, good, excellent)
    Log {
        mood: Mood,

        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Show recent entries
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum TechniqueAction {
    /// Record that you used a technique
    Log {
        name: String,

        /// How much it helped, 1-5
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Show recent usage
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum SafetyPlanAction {
    Show,
    /// Replace one section of the plan
    Set {
        section: SafetyPlanSection,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MedicationAction {
    /// Add a daily medication reminder
    Add {
        name: String,

        /// Time of day as HH:MM
        #[arg(long, value_parser = parse_time)]
        at: NaiveTime,
    },
    List,
}

#[derive(Subcommand)]
enum PreferencesAction {
    Show,
    /// Set a preference; `true`/`false` are stored as booleans
    Set { name: String, value: String },
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| format!("expected HH:MM, got '{}'", s))
}

fn main() -> Result<()> {
    // Initialize logging
    haven_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let mut store = JsonFileStore::new(data_dir);

    match cli.command {
        Some(Commands::Suggest { text, json }) => cmd_suggest(&text.join(" "), json),
        Some(Commands::Reminder { random }) => cmd_reminder(random),
        Some(Commands::Techniques { category }) => cmd_techniques(category),
        Some(Commands::Chat { action }) => cmd_chat(&mut store, action, &config),
        Some(Commands::Mood { action }) => cmd_mood(&mut store, action, &config),
        Some(Commands::Technique { action }) => cmd_technique(&mut store, action),
        Some(Commands::Progress { json }) => cmd_progress(&store, json),
        Some(Commands::SafetyPlan { action }) => cmd_safety_plan(&mut store, action),
        Some(Commands::Crisis) => cmd_crisis(),
        Some(Commands::Schedule) => cmd_schedule(&store, &config),
        Some(Commands::Medication { action }) => cmd_medication(&mut store, action),
        Some(Commands::Preferences { action }) => cmd_preferences(&mut store, action),
        Some(Commands::ClearData { yes }) => cmd_clear_data(&mut store, yes),
        None => cmd_reminder(false),
    }
}

fn cmd_suggest(text: &str, json: bool) -> Result<()> {
    let suggestions = suggest_techniques(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No matching techniques found.");
        println!("Try `haven techniques` to browse everything.");
        return Ok(());
    }

    println!("Suggested techniques:");
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!();
        println!(
            "  {}. {} ({})",
            i + 1,
            suggestion.technique.name,
            suggestion.category.display_name()
        );
        println!("     {}", suggestion.technique.description);
        println!("     Example: {}", suggestion.technique.example);
    }
    Ok(())
}

fn cmd_reminder(random: bool) -> Result<()> {
    let reminder = if random {
        random_reminder()
    } else {
        daily_reminder()
    };
    println!("{}", reminder);
    Ok(())
}

fn cmd_techniques(category: Option<TechniqueCategory>) -> Result<()> {
    let catalog = default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid technique catalog".into()));
    }

    let categories: Vec<TechniqueCategory> = match category {
        Some(c) => vec![c],
        None => TechniqueCategory::ALL.to_vec(),
    };

    for category in categories {
        println!("{}", category.display_name());
        for technique in catalog.techniques_in(category) {
            println!("  - {}: {}", technique.name, technique.description);
        }
        println!();
    }
    Ok(())
}

fn cmd_chat(store: &mut JsonFileStore, action: ChatAction, config: &Config) -> Result<()> {
    match action {
        ChatAction::Send { message } => {
            let backend = http::HttpBackend::new(config.chat.endpoint.clone());
            let mut session = ChatSession::new(backend, config).resume(&*store)?;
            let reply = session.send_and_record(
                store,
                &message.join(" "),
                std::time::Instant::now(),
                Utc::now(),
            )?;

            println!("{}", reply.text);
            if !reply.suggestions.is_empty() {
                println!();
                println!("Techniques that may help:");
                for suggestion in &reply.suggestions {
                    println!(
                        "  - {} ({})",
                        suggestion.technique.name,
                        suggestion.category.display_name()
                    );
                }
            }
        }
        ChatAction::History { limit } => {
            let history = journal::conversation_history(&*store)?;
            if history.is_empty() {
                println!("No conversation yet.");
            }
            let start = history.len().saturating_sub(limit);
            for entry in &history[start..] {
                let speaker = match entry.message.role {
                    ChatRole::User => "You",
                    _ => "Haven",
                };
                println!(
                    "{}  {}: {}",
                    entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    speaker,
                    entry.message.content
                );
            }
        }
    }
    Ok(())
}

fn cmd_mood(store: &mut JsonFileStore, action: MoodAction, config: &Config) -> Result<()> {
    match action {
        MoodAction::Log { mood, notes } => {
            let entry = journal::log_mood(store, mood, &notes, &config.journal, Local::now())?;
            println!("✓ Logged mood: {} ({}/5)", entry.mood_name, entry.mood);
        }
        MoodAction::List { limit } => {
            let logs = journal::mood_logs(&*store)?;
            if logs.is_empty() {
                println!("No mood entries yet.");
            }
            for entry in logs.iter().take(limit) {
                if entry.notes.is_empty() {
                    println!("{}  {} ({}/5)", entry.date, entry.mood_name, entry.mood);
                } else {
                    println!(
                        "{}  {} ({}/5)  {}",
                        entry.date, entry.mood_name, entry.mood, entry.notes
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_technique(store: &mut JsonFileStore, action: TechniqueAction) -> Result<()> {
    match action {
        TechniqueAction::Log { name, rating } => {
            let usage = journal::log_technique_usage(store, &name, rating, Local::now())?;
            println!(
                "✓ Logged {} ({})",
                usage.technique,
                usage.category.display_name()
            );
        }
        TechniqueAction::List { limit } => {
            let usage = journal::technique_usage(&*store)?;
            if usage.is_empty() {
                println!("No techniques logged yet.");
            }
            for entry in usage.iter().take(limit) {
                let rating = entry
                    .effectiveness
                    .map(|r| format!("  helped {}/5", r))
                    .unwrap_or_default();
                println!(
                    "{}  {} [{}]{}",
                    entry.date,
                    entry.technique,
                    entry.category.display_name(),
                    rating
                );
            }
        }
    }
    Ok(())
}

fn cmd_progress(store: &JsonFileStore, json: bool) -> Result<()> {
    let logs = journal::mood_logs(store)?;
    let usage = journal::technique_usage(store)?;
    let summary = ProgressSummary::compute(&logs, &usage, Local::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Mood, last {} days:", summary.trend.len());
    for day in &summary.trend {
        match day.average {
            Some(average) => println!(
                "  {}  {:<5} {:.1}",
                day.date.format("%a %d"),
                "█".repeat(average.round() as usize),
                average
            ),
            None => println!("  {}  -", day.date.format("%a %d")),
        }
    }
    println!();

    match summary.average_mood {
        Some(average) => println!(
            "Average mood: {:.1}/5 over {} day(s)",
            average, summary.days_logged
        ),
        None => println!("No mood entries in the last week."),
    }
    println!("Mood entries: {}", summary.total_mood_logs);
    println!("Techniques used: {}", summary.total_technique_uses);

    if !summary.top_techniques.is_empty() {
        println!();
        println!("Most used:");
        for count in &summary.top_techniques {
            println!("  {} ×{}", count.technique, count.count);
        }
    }
    Ok(())
}

fn cmd_safety_plan(store: &mut JsonFileStore, action: SafetyPlanAction) -> Result<()> {
    match action {
        SafetyPlanAction::Show => {
            let plan = journal::load_safety_plan(&*store)?;
            for section in SafetyPlanSection::ALL {
                println!("{}", section.title());
                let text = plan.section(section);
                if text.is_empty() {
                    println!("  (not filled in)");
                } else {
                    for line in text.lines() {
                        println!("  {}", line);
                    }
                }
                println!();
            }
        }
        SafetyPlanAction::Set { section, text } => {
            journal::update_safety_plan(store, section, &text.join(" "))?;
            println!("✓ Updated {}", section.title());
        }
    }
    Ok(())
}

fn cmd_crisis() -> Result<()> {
    println!("If you are in immediate danger, call {}.", crisis::EMERGENCY_NUMBER);
    println!();
    for resource in CRISIS_RESOURCES {
        println!("  {}", resource.label());
        println!("    {}", resource.description);
        println!("    {}", resource.contact_uri());
    }
    Ok(())
}

fn cmd_schedule(store: &JsonFileStore, config: &Config) -> Result<()> {
    let medications = journal::medications(store)?;
    let now = Local::now();

    for schedule in active_schedules(&config.reminders, &medications) {
        let next = schedule
            .trigger
            .next_after(&now)
            .map(|t| t.format("%a %H:%M").to_string())
            .unwrap_or_else(|| "never".into());
        println!("{}  ({})", schedule.title, schedule.trigger.describe());
        println!("  {}", schedule.body);
        println!("  next: {}", next);
    }
    Ok(())
}

fn cmd_medication(store: &mut JsonFileStore, action: MedicationAction) -> Result<()> {
    match action {
        MedicationAction::Add { name, at } => {
            let medication = Medication::new(name, at.hour(), at.minute());
            journal::add_medication(store, medication.clone())?;
            println!(
                "✓ Reminder set for {} at {:02}:{:02}",
                medication.name, medication.hour, medication.minute
            );
        }
        MedicationAction::List => {
            let medications = journal::medications(&*store)?;
            if medications.is_empty() {
                println!("No medication reminders.");
            }
            for medication in medications {
                println!(
                    "{:02}:{:02}  {}",
                    medication.hour, medication.minute, medication.name
                );
            }
        }
    }
    Ok(())
}

fn cmd_preferences(store: &mut JsonFileStore, action: PreferencesAction) -> Result<()> {
    match action {
        PreferencesAction::Show => {
            let prefs = journal::load_preferences(&*store)?;
            if prefs.is_empty() {
                println!("No preferences set.");
            }
            for (name, value) in &prefs {
                println!("{} = {}", name, value);
            }
        }
        PreferencesAction::Set { name, value } => {
            let value = match value.parse::<bool>() {
                Ok(flag) => serde_json::Value::Bool(flag),
                Err(_) => serde_json::Value::String(value),
            };
            journal::set_preference(store, &name, value)?;
            println!("✓ Set {}", name);
        }
    }
    Ok(())
}

fn cmd_clear_data(store: &mut JsonFileStore, yes: bool) -> Result<()> {
    if !yes {
        eprintln!("This deletes everything in {}.", store.dir().display());
        eprintln!("Run again with --yes to confirm.");
        return Err(Error::Other("Not confirmed".into()));
    }
    journal::clear_all(store)?;
    println!("✓ All data cleared");
    Ok(())
}
