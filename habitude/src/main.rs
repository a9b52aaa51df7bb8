//! habitude - habit formation tracker
//!
//! Command line interface for creating habits, logging daily completions,
//! and reviewing streaks, strength scores, and milestones.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/habitude/data.db (~/.local/share/habitude/data.db)
//! - Config: $XDG_CONFIG_HOME/habitude/config.toml (~/.config/habitude/config.toml)

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use habitude_core::analytics::{
    current_streak, dashboard, day_cells, due_report, habit_strength, longest_streak,
    mark_report_checked, month_bounds, pending_milestones, strength_history, ReportPeriod,
    Snapshot, MILESTONE_THRESHOLDS,
};
use habitude_core::types::{
    parse_date, week_start, AutomaticityRating, CustomCategory, Habit, HabitCategory,
    JournalEntry, Schedule,
};
use habitude_core::{Config, Database};

#[derive(Parser)]
#[command(name = "habitude")]
#[command(about = "Track habit formation from the command line")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        /// Category: morning, health, academics, evening, productivity,
        /// wellness, or a custom category name
        #[arg(short, long, default_value = "productivity")]
        category: String,

        /// Schedule kind: daily, weekly, or monthly
        #[arg(short, long, default_value = "daily")]
        schedule: String,

        /// Weekly target days, 0=Sunday through 6=Saturday (e.g. --days 1,3,5)
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,

        /// Monthly target count (informational, never affects streaks)
        #[arg(long)]
        target: Option<u32>,

        /// Stacking cue: the existing habit this follows ("pour my coffee")
        #[arg(long)]
        after: Option<String>,

        /// Stacking action: what you will do ("meditate for two minutes")
        #[arg(long)]
        then: Option<String>,

        /// Two-minute starter version of the habit
        #[arg(long = "two-minute")]
        two_minute: Option<String>,

        /// Where the habit happens
        #[arg(long)]
        context: Option<String>,
    },

    /// Edit an existing habit
    Edit {
        /// Habit name or id (partial match supported)
        habit: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New schedule kind: daily, weekly, or monthly
        #[arg(short, long)]
        schedule: Option<String>,

        /// Weekly target days, 0=Sunday through 6=Saturday
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,

        /// Monthly target count
        #[arg(long)]
        target: Option<u32>,

        /// Stacking cue (pass an empty string to clear)
        #[arg(long)]
        after: Option<String>,

        /// Stacking action (pass an empty string to clear)
        #[arg(long)]
        then: Option<String>,

        /// Two-minute starter (pass an empty string to clear)
        #[arg(long = "two-minute")]
        two_minute: Option<String>,

        /// Context cue (pass an empty string to clear)
        #[arg(long)]
        context: Option<String>,
    },

    /// Delete a habit and its completion history
    Rm {
        /// Habit name or id (partial match supported)
        habit: String,
    },

    /// List all habits with streaks and strength
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle a completion on or off
    Toggle {
        /// Habit name or id (partial match supported)
        habit: String,

        /// Day to toggle, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show today's checklist
    Today,

    /// Show aggregate statistics, or detail for one habit
    Stats {
        /// Habit name or id (partial match supported)
        habit: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a month of completions as a calendar
    Calendar {
        /// Habit name or id; omit for an all-habits view
        habit: Option<String>,

        /// Month to show, YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Record the weekly automaticity self-rating (1=very deliberate, 5=fully automatic)
    Rate {
        /// Habit name or id (partial match supported)
        habit: String,

        /// Rating from 1 to 5
        rating: u8,

        /// Optional note about the week
        #[arg(long)]
        notes: Option<String>,

        /// Week to rate, any date inside it (default: this week)
        #[arg(long)]
        week: Option<String>,
    },

    /// Daily reflection journal
    Journal {
        #[command(subcommand)]
        command: JournalCommand,
    },

    /// Manage habit categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommand,
    },
}

#[derive(Subcommand)]
enum JournalCommand {
    /// Write (or rewrite) the entry for a day
    Write {
        /// Free-text reflection
        content: String,

        /// Day the entry reflects on, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// A small win to celebrate (repeatable)
        #[arg(long = "win")]
        wins: Vec<String>,

        /// Why a habit was missed (repeatable)
        #[arg(long = "miss")]
        misses: Vec<String>,
    },

    /// Show the entry for a day
    Show {
        /// Day to show, YYYY-MM-DD (default: today)
        date: Option<String>,
    },

    /// List recent entries
    List {
        /// Maximum entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Add a custom category
    Add {
        /// Category name
        name: String,

        /// Display color
        #[arg(long, default_value = "hsl(220 9% 46%)")]
        color: String,

        /// Display icon name
        #[arg(long)]
        icon: Option<String>,
    },

    /// List preset and custom categories
    List,

    /// Remove a custom category (its habits move to Productivity)
    Rm {
        /// Category name
        name: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        habitude_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // Open database
    let db_path = Config::database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let today = Local::now().date_naive();

    match args.command {
        Command::Add {
            name,
            category,
            schedule,
            days,
            target,
            after,
            then,
            two_minute,
            context,
        } => cmd_add(
            &db, &name, &category, &schedule, &days, target, after, then, two_minute, context,
        ),
        Command::Edit {
            habit,
            name,
            category,
            schedule,
            days,
            target,
            after,
            then,
            two_minute,
            context,
        } => cmd_edit(
            &db, &habit, name, category, schedule, &days, target, after, then, two_minute, context,
        ),
        Command::Rm { habit } => cmd_rm(&db, &habit),
        Command::List { json } => cmd_list(&db, today, json),
        Command::Toggle { habit, date } => cmd_toggle(&db, &habit, date.as_deref(), today),
        Command::Today => cmd_today(&db, today),
        Command::Stats { habit, json } => match habit {
            Some(habit) => cmd_stats_habit(&db, &habit, today),
            None => cmd_stats(&db, today, json),
        },
        Command::Calendar { habit, month } => {
            cmd_calendar(&db, habit.as_deref(), month.as_deref(), today)
        }
        Command::Rate {
            habit,
            rating,
            notes,
            week,
        } => cmd_rate(&db, &habit, rating, notes, week.as_deref(), today),
        Command::Journal { command } => match command {
            JournalCommand::Write {
                content,
                date,
                wins,
                misses,
            } => cmd_journal_write(&db, content, date.as_deref(), wins, misses, today),
            JournalCommand::Show { date } => cmd_journal_show(&db, date.as_deref(), today),
            JournalCommand::List { limit } => cmd_journal_list(&db, limit),
        },
        Command::Categories { command } => match command {
            CategoryCommand::Add { name, color, icon } => {
                cmd_categories_add(&db, name, color, icon)
            }
            CategoryCommand::List => cmd_categories_list(&db),
            CategoryCommand::Rm { name } => cmd_categories_rm(&db, &name),
        },
    }
}

// ============================================
// Habit Commands
// ============================================

#[allow(clippy::too_many_arguments)]
fn cmd_add(
    db: &Database,
    name: &str,
    category: &str,
    schedule: &str,
    days: &[u8],
    target: Option<u32>,
    after: Option<String>,
    then: Option<String>,
    two_minute: Option<String>,
    context: Option<String>,
) -> Result<()> {
    let (category, custom_category) = resolve_category(db, category)?;
    let schedule = build_schedule(schedule, days, target)?;

    let mut habit = Habit::new(name, category, schedule);
    habit.custom_category = custom_category;
    habit.stacking_cue = non_empty(after);
    habit.stacking_action = non_empty(then);
    habit.two_minute_action = non_empty(two_minute);
    habit.context_cue = non_empty(context);

    db.upsert_habit(&habit)?;
    tracing::info!(habit_id = %habit.id, name = %habit.name, "Habit created");

    println!("Added '{}' ({}).", habit.name, habit.schedule.describe());
    if let (Some(cue), Some(action)) = (&habit.stacking_cue, &habit.stacking_action) {
        println!("  \"After I {}, I will {}.\"", cue, action);
    }
    if let Some(starter) = &habit.two_minute_action {
        println!("  Two-minute version: {}", starter);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_edit(
    db: &Database,
    query: &str,
    name: Option<String>,
    category: Option<String>,
    schedule: Option<String>,
    days: &[u8],
    target: Option<u32>,
    after: Option<String>,
    then: Option<String>,
    two_minute: Option<String>,
    context: Option<String>,
) -> Result<()> {
    let mut habit = resolve_habit(db, query)?;

    if let Some(name) = name {
        habit.name = name;
    }
    if let Some(category) = category {
        let (category, custom_category) = resolve_category(db, &category)?;
        habit.category = category;
        habit.custom_category = custom_category;
    }
    if let Some(kind) = schedule {
        habit.schedule = build_schedule(&kind, days, target)?;
    } else if !days.is_empty() || target.is_some() {
        // Adjust the existing schedule in place
        match &habit.schedule {
            Schedule::Weekly { .. } if !days.is_empty() => {
                habit.schedule = build_schedule("weekly", days, None)?;
            }
            Schedule::Monthly { .. } if target.is_some() => {
                habit.schedule = build_schedule("monthly", &[], target)?;
            }
            other => anyhow::bail!(
                "--days/--target only apply to weekly/monthly habits; \
                 this habit is {} (pass --schedule to change it)",
                other.kind()
            ),
        }
    }
    merge_cue(&mut habit.stacking_cue, after);
    merge_cue(&mut habit.stacking_action, then);
    merge_cue(&mut habit.two_minute_action, two_minute);
    merge_cue(&mut habit.context_cue, context);

    db.upsert_habit(&habit)?;
    println!("Updated '{}' ({}).", habit.name, habit.schedule.describe());
    Ok(())
}

fn cmd_rm(db: &Database, query: &str) -> Result<()> {
    let habit = resolve_habit(db, query)?;
    db.delete_habit(&habit.id)?;
    println!("Deleted '{}' and its completion history.", habit.name);
    Ok(())
}

fn cmd_list(db: &Database, today: NaiveDate, json: bool) -> Result<()> {
    let stats = dashboard(db, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats.habits)?);
        return Ok(());
    }

    if stats.habits.is_empty() {
        println!("No habits yet. Create one with 'habitude add NAME'.");
        return Ok(());
    }

    println!(
        "{:<24} {:<22} {:<22} {:>6} {:>8}  {}",
        "NAME", "CATEGORY", "SCHEDULE", "STREAK", "STRENGTH", "PHASE"
    );
    println!("{:-<96}", "");
    for habit in &stats.habits {
        println!(
            "{:<24} {:<22} {:<22} {:>6} {:>8}  {}",
            truncate(&habit.name, 22),
            truncate(&habit.category, 20),
            truncate(&habit.schedule, 20),
            habit.streak,
            habit.strength,
            habit.phase.label()
        );
    }
    Ok(())
}

fn cmd_toggle(db: &Database, query: &str, date_arg: Option<&str>, today: NaiveDate) -> Result<()> {
    let date = match date_arg {
        Some(s) => parse_date(s)?,
        None => today,
    };
    if date > today {
        anyhow::bail!("cannot log a completion on {} (future date)", date);
    }

    let habit = resolve_habit(db, query)?;
    let now_completed = db.toggle_completion(&habit.id, date)?;

    if now_completed {
        println!("Marked '{}' done for {}.", habit.name, date);
        celebrate_milestones(db, today)?;
    } else {
        println!("Unmarked '{}' for {}.", habit.name, date);
    }
    Ok(())
}

fn cmd_today(db: &Database, today: NaiveDate) -> Result<()> {
    let stats = dashboard(db, today)?;

    let title = format!("Today - {}", today.format("%A, %B %-d"));
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));

    if stats.habit_count == 0 {
        println!();
        println!("No habits yet. Create one with 'habitude add NAME'.");
        return Ok(());
    }

    let due: Vec<_> = stats.habits.iter().filter(|h| h.due_today).collect();
    let off_schedule: Vec<_> = stats.habits.iter().filter(|h| !h.due_today).collect();

    println!();
    for habit in &due {
        println!(
            "  [{}] {:<24} {:<22} {}",
            if habit.completed_today { "x" } else { " " },
            truncate(&habit.name, 24),
            truncate(&habit.category, 22),
            streak_label(habit.streak)
        );
    }
    if !off_schedule.is_empty() {
        println!();
        println!("Not scheduled today:");
        for habit in &off_schedule {
            println!(
                "  [{}] {:<24} {:<22} {}",
                if habit.completed_today { "x" } else { " " },
                truncate(&habit.name, 24),
                truncate(&habit.category, 22),
                streak_label(habit.streak)
            );
        }
    }

    println!();
    println!("{} done today.", stats.completion_summary());

    celebrate_milestones(db, today)?;

    if let Some(period) = due_report(db, today)? {
        println!();
        match period {
            ReportPeriod::Week(_) => {
                println!("Your week in review is ready: run 'habitude-report --week'");
            }
            ReportPeriod::Month(year, month) => {
                println!(
                    "Your {} review is ready: run 'habitude-report --month {}-{:02}'",
                    period.display_name(),
                    year,
                    month
                );
            }
        }
        mark_report_checked(db, today)?;
    }

    Ok(())
}

// ============================================
// Stats Commands
// ============================================

fn cmd_stats(db: &Database, today: NaiveDate, json: bool) -> Result<()> {
    let stats = dashboard(db, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Habit Statistics");
    println!("================");
    println!();
    println!("Habits:            {}", stats.habit_count);
    println!("Due today:         {}", stats.due_today);
    println!("Completed today:   {}", stats.completed_today);
    println!("Average strength:  {}", stats.avg_strength);
    println!("Automatic habits:  {}", stats.automatic_count);
    println!("Best streak:       {} days", stats.longest_current_streak);

    if !stats.habits.is_empty() {
        println!();
        println!(
            "{:<24} {:>6} {:>8} {:>9} {:>7}  {}",
            "NAME", "STREAK", "LONGEST", "STRENGTH", "TOTAL", "PHASE"
        );
        println!("{:-<72}", "");
        for habit in &stats.habits {
            println!(
                "{:<24} {:>6} {:>8} {:>9} {:>7}  {}",
                truncate(&habit.name, 22),
                habit.streak,
                habit.longest_streak,
                habit.strength,
                habit.total_completions,
                habit.phase.label()
            );
        }
    }
    Ok(())
}

fn cmd_stats_habit(db: &Database, query: &str, today: NaiveDate) -> Result<()> {
    let habit = resolve_habit(db, query)?;
    let snapshot = Snapshot::load(db)?;

    let total = snapshot.total_completions(&habit.id);
    let score = habit_strength(total, habit.days_since_created(today));
    let streak = current_streak(&snapshot, &habit.id, today);
    let longest = longest_streak(&snapshot, &habit.id);

    println!("{}", habit.name);
    println!("{}", "=".repeat(habit.name.len()));
    println!();
    println!("Category:       {}", category_label(&habit));
    println!("Schedule:       {}", habit.schedule.describe());
    println!(
        "Created:        {} ({} days ago)",
        habit.created_at.date_naive(),
        habit.days_since_created(today)
    );
    println!("Streak:         {} days (longest {})", streak, longest);
    println!("Strength:       {} ({})", score.strength, score.phase.label());
    println!("Completions:    {}", total);

    let ratings = db.get_habit_ratings(&habit.id)?;
    if let Some(last) = ratings.last() {
        let label = AutomaticityRating::label_for(last.rating).unwrap_or("?");
        println!(
            "Last rating:    {} ({}) in week of {}",
            last.rating, label, last.week_start
        );
    }

    let history = strength_history(&snapshot, &habit.id, today, 30);
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        println!(
            "30-day trend:   {:.1} -> {:.1}",
            first.strength, last.strength
        );
    }

    if habit.stacking_cue.is_some()
        || habit.two_minute_action.is_some()
        || habit.context_cue.is_some()
    {
        println!();
        if let Some(cue) = &habit.stacking_cue {
            println!("After I:        {}", cue);
        }
        if let Some(action) = &habit.stacking_action {
            println!("I will:         {}", action);
        }
        if let Some(starter) = &habit.two_minute_action {
            println!("Two-minute:     {}", starter);
        }
        if let Some(place) = &habit.context_cue {
            println!("Where:          {}", place);
        }
    }

    println!();
    match MILESTONE_THRESHOLDS.iter().find(|t| **t > streak) {
        Some(next) => println!("Next milestone: {} days ({} to go)", next, next - streak),
        None => println!("All milestones reached 🏆"),
    }
    Ok(())
}

// ============================================
// Calendar Command
// ============================================

fn cmd_calendar(
    db: &Database,
    habit_query: Option<&str>,
    month_arg: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let (year, month) = match month_arg {
        Some(s) => parse_month(s)?,
        None => (today.year(), today.month()),
    };
    let (start, end) =
        month_bounds(year, month).ok_or_else(|| anyhow::anyhow!("invalid month {}", month))?;

    let snapshot = Snapshot::load(db)?;

    let habit = match habit_query {
        Some(query) => Some(resolve_habit(db, query)?),
        None => None,
    };

    let title = match &habit {
        Some(habit) => format!("{} - {}", start.format("%B %Y"), habit.name),
        None => format!("{} - all habits", start.format("%B %Y")),
    };
    println!("{}", title);
    println!();
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");

    let all_cells = day_cells(&snapshot, start, end);
    for _ in 0..start.weekday().num_days_from_monday() {
        print!("    ");
    }
    for cell in &all_cells {
        let mark = match &habit {
            Some(habit) => {
                let completed = snapshot.is_completed(&habit.id, cell.date);
                let due = habit.schedule.is_scheduled_on(cell.date);
                if completed {
                    '*'
                } else if due && cell.date <= today {
                    '.'
                } else {
                    ' '
                }
            }
            None => {
                if cell.due > 0 && cell.completed >= cell.due {
                    '*'
                } else if cell.completed > 0 {
                    '+'
                } else if cell.due > 0 && cell.date <= today {
                    '.'
                } else {
                    ' '
                }
            }
        };
        print!("{:>3}{}", cell.date.day(), mark);
        if cell.date.weekday().num_days_from_monday() == 6 {
            println!();
        }
    }
    if end.weekday().num_days_from_monday() != 6 {
        println!();
    }

    println!();
    match habit {
        Some(_) => println!("* completed   . due but missed"),
        None => println!("* all done   + some done   . none done"),
    }
    Ok(())
}

// ============================================
// Rating and Journal Commands
// ============================================

fn cmd_rate(
    db: &Database,
    query: &str,
    rating: u8,
    notes: Option<String>,
    week_arg: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let habit = resolve_habit(db, query)?;
    let start = match week_arg {
        Some(s) => week_start(parse_date(s)?),
        None => week_start(today),
    };

    let mut record = AutomaticityRating::new(&habit.id, start, rating);
    record.notes = non_empty(notes);
    db.upsert_rating(&record)?;

    let label = AutomaticityRating::label_for(rating).unwrap_or("?");
    println!(
        "Rated '{}' {} ({}) for the week of {}.",
        habit.name, rating, label, start
    );
    Ok(())
}

fn cmd_journal_write(
    db: &Database,
    content: String,
    date_arg: Option<&str>,
    wins: Vec<String>,
    misses: Vec<String>,
    today: NaiveDate,
) -> Result<()> {
    let date = match date_arg {
        Some(s) => parse_date(s)?,
        None => today,
    };
    if date > today {
        anyhow::bail!("cannot journal about {} (future date)", date);
    }

    let mut entry = JournalEntry::new(date, content);
    entry.wins = wins;
    entry.misses = misses;
    db.upsert_journal_entry(&entry)?;

    println!("Journal entry saved for {}.", date);
    Ok(())
}

fn cmd_journal_show(db: &Database, date_arg: Option<&str>, today: NaiveDate) -> Result<()> {
    let date = match date_arg {
        Some(s) => parse_date(s)?,
        None => today,
    };

    match db.get_journal_entry(date)? {
        Some(entry) => print_journal_entry(&entry),
        None => println!("No journal entry for {}.", date),
    }
    Ok(())
}

fn cmd_journal_list(db: &Database, limit: usize) -> Result<()> {
    let entries = db.list_journal_entries()?;
    if entries.is_empty() {
        println!("No journal entries yet.");
        return Ok(());
    }

    for entry in entries.iter().take(limit) {
        print_journal_entry(entry);
        println!();
    }
    Ok(())
}

fn print_journal_entry(entry: &JournalEntry) {
    println!("{} - {}", entry.date, entry.content);
    for win in &entry.wins {
        println!("  + {}", win);
    }
    for miss in &entry.misses {
        println!("  - {}", miss);
    }
}

// ============================================
// Category Commands
// ============================================

fn cmd_categories_add(
    db: &Database,
    name: String,
    color: String,
    icon: Option<String>,
) -> Result<()> {
    let category = CustomCategory::new(name, color, icon);
    db.add_custom_category(&category)?;
    println!("Added category '{}'.", category.name);
    Ok(())
}

fn cmd_categories_list(db: &Database) -> Result<()> {
    println!("{:<24} {:<8} {}", "NAME", "KIND", "COLOR");
    println!("{:-<52}", "");
    for preset in HabitCategory::presets() {
        if let Some(meta) = preset.preset_meta() {
            println!("{:<24} {:<8} {}", meta.label, "preset", meta.color);
        }
    }
    for category in db.list_custom_categories()? {
        println!("{:<24} {:<8} {}", category.name, "custom", category.color);
    }
    Ok(())
}

fn cmd_categories_rm(db: &Database, name: &str) -> Result<()> {
    let reassigned = db.delete_custom_category(name)?;
    if reassigned > 0 {
        println!(
            "Removed category '{}'; {} habit(s) moved to Productivity.",
            name, reassigned
        );
    } else {
        println!("Removed category '{}'.", name);
    }
    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Find a habit by id, exact name, or partial name match.
fn resolve_habit(db: &Database, query: &str) -> Result<Habit> {
    let habits = db.list_habits()?;

    if let Some(habit) = habits.iter().find(|h| h.id == query) {
        return Ok(habit.clone());
    }

    let lower = query.to_lowercase();
    if let Some(habit) = habits.iter().find(|h| h.name.to_lowercase() == lower) {
        return Ok(habit.clone());
    }

    let matches: Vec<_> = habits
        .iter()
        .filter(|h| h.name.to_lowercase().contains(&lower) || h.id.starts_with(query))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("no habit matching '{}'", query),
        1 => Ok(matches[0].clone()),
        _ => {
            let names: Vec<&str> = matches.iter().map(|h| h.name.as_str()).collect();
            anyhow::bail!("'{}' matches multiple habits: {}", query, names.join(", "))
        }
    }
}

/// Map a category argument to a preset or a known custom category.
fn resolve_category(db: &Database, input: &str) -> Result<(HabitCategory, Option<String>)> {
    if let Ok(preset) = input.parse::<HabitCategory>() {
        if preset != HabitCategory::Custom {
            return Ok((preset, None));
        }
    }

    let lower = input.to_lowercase();
    for category in db.list_custom_categories()? {
        if category.name.to_lowercase() == lower {
            return Ok((HabitCategory::Custom, Some(category.name)));
        }
    }

    let presets: Vec<&str> = HabitCategory::presets().iter().map(|c| c.as_str()).collect();
    anyhow::bail!(
        "unknown category '{}': expected one of {} or a custom category \
         (see 'habitude categories list')",
        input,
        presets.join(", ")
    )
}

fn build_schedule(kind: &str, days: &[u8], target: Option<u32>) -> Result<Schedule> {
    match kind {
        "daily" => Ok(Schedule::Daily),
        "weekly" => {
            if days.is_empty() {
                anyhow::bail!("weekly schedule requires --days (0=Sunday through 6=Saturday)");
            }
            if let Some(bad) = days.iter().find(|d| **d > 6) {
                anyhow::bail!("invalid weekday {}: must be 0-6", bad);
            }
            let mut target_days = days.to_vec();
            target_days.sort_unstable();
            target_days.dedup();
            Ok(Schedule::Weekly { target_days })
        }
        "monthly" => {
            let target_count =
                target.ok_or_else(|| anyhow::anyhow!("monthly schedule requires --target"))?;
            if target_count == 0 {
                anyhow::bail!("monthly target must be at least 1");
            }
            Ok(Schedule::Monthly { target_count })
        }
        other => anyhow::bail!(
            "unknown schedule '{}': expected daily, weekly, or monthly",
            other
        ),
    }
}

/// Parse YYYY-MM into (year, month).
fn parse_month(s: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        anyhow::bail!("invalid month '{}': expected YYYY-MM", s);
    }
    let year: i32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid year in '{}'", s))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid month in '{}'", s))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("month must be 1-12, got {}", month);
    }
    Ok((year, month))
}

fn celebrate_milestones(db: &Database, today: NaiveDate) -> Result<()> {
    let snapshot = Snapshot::load(db)?;
    let pending = pending_milestones(db, &snapshot, today)?;
    for milestone in &pending {
        println!();
        println!("  {}: {}", milestone.habit_name, milestone.message);
        db.mark_milestone_seen(&milestone.habit_id, milestone.streak)?;
    }
    Ok(())
}

fn category_label(habit: &Habit) -> String {
    if habit.category == HabitCategory::Custom {
        if let Some(name) = &habit.custom_category {
            return name.clone();
        }
    }
    match habit.category.preset_meta() {
        Some(meta) => meta.label.to_string(),
        None => habit.category.to_string(),
    }
}

fn streak_label(streak: u32) -> String {
    if streak > 0 {
        format!("{} day streak", streak)
    } else {
        String::new()
    }
}

fn merge_cue(current: &mut Option<String>, update: Option<String>) {
    if let Some(value) = update {
        *current = if value.is_empty() { None } else { Some(value) };
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
