//! habitude-report - Week and Month in Review CLI
//!
//! Generate summaries of habit completions, streaks, and journal highlights.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use habitude_core::analytics::{
    generate_report, mark_report_checked, HabitReport, ReportOptions, ReportPeriod,
    TrendComparison,
};
use habitude_core::{Config, Database};

#[derive(Parser, Debug)]
#[command(name = "habitude-report")]
#[command(about = "Habit reports - your week and month in review")]
#[command(version)]
struct Args {
    /// Report on the current week (default)
    #[arg(long)]
    week: bool,

    /// Report on the previous week
    #[arg(long)]
    last_week: bool,

    /// Report on a specific month (format: YYYY-MM)
    #[arg(long)]
    month: Option<String>,

    /// Disable fun mode (no headline, plain headings)
    #[arg(long)]
    serious: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Disable trend comparison with previous period
    #[arg(long)]
    no_trends: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration and database
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = habitude_core::logging::init(&config.logging).ok();

    let db_path = Config::database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let today = Local::now().date_naive();

    // Determine the period
    let period = if let Some(month_str) = &args.month {
        // Parse YYYY-MM format
        let parts: Vec<&str> = month_str.split('-').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid month format. Use YYYY-MM (e.g., 2025-03)");
        }
        let year: i32 = parts[0].parse().context("Invalid year")?;
        let month: u32 = parts[1].parse().context("Invalid month")?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("Month must be between 1 and 12");
        }
        ReportPeriod::Month(year, month)
    } else if args.last_week {
        ReportPeriod::week_of(today).previous()
    } else if args.week {
        ReportPeriod::week_of(today)
    } else {
        // current week is the default with no flags at all
        ReportPeriod::week_of(today)
    };

    // Configure report generation
    let mut options = ReportOptions::from_config(&config.report);
    if args.serious {
        options.fun_mode = false;
    }
    if args.no_trends {
        options.include_trends = false;
    }

    // Generate the report
    let report =
        generate_report(&db, period, &options, today).context("failed to generate report")?;

    // Output based on export format
    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_markdown(&report, options.fun_mode),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report, options.fun_mode),
    }

    // Viewing a report satisfies the checklist reminder
    mark_report_checked(&db, today)?;

    Ok(())
}

fn print_terminal(report: &HabitReport, fun_mode: bool) {
    let title = if fun_mode {
        format!("🌟 {} IN REVIEW 🌟", report.period.display_name().to_uppercase())
    } else {
        format!("Habit Report: {}", report.period.display_name())
    };

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    // Check if there's any data
    if report.summary.expected == 0 && report.summary.completed == 0 {
        println!("  No habit activity found for this period.");
        println!();
        return;
    }

    if let Some(headline) = report.headline {
        println!("  {}", headline);
        println!();
    }

    // The Numbers
    if fun_mode {
        println!("📊 THE NUMBERS");
    } else {
        println!("SUMMARY");
    }
    println!(
        "   Expected:  {:<10} Completed: {}",
        report.summary.expected, report.summary.completed
    );
    println!("   Rate:      {}%", report.summary.rate);
    println!();

    // Streaks
    if fun_mode {
        println!("🔥 STREAKS");
    } else {
        println!("STREAKS");
    }
    println!(
        "   Best:     {} day{}",
        report.summary.best_streak,
        plural(report.summary.best_streak)
    );
    println!(
        "   Current:  {} day{}",
        report.summary.current_streak,
        plural(report.summary.current_streak)
    );
    println!();

    // Top Habits
    if !report.top_habits.is_empty() {
        if fun_mode {
            println!("🏆 TOP HABITS");
        } else {
            println!("TOP HABITS");
        }
        for (i, habit) in report.top_habits.iter().enumerate() {
            let rank = match i {
                0 if fun_mode => "🥇".to_string(),
                1 if fun_mode => "🥈".to_string(),
                2 if fun_mode => "🥉".to_string(),
                _ => format!("{}.", i + 1),
            };
            println!(
                "   {} {:<24} {:>3}%  ({}/{})",
                rank, habit.name, habit.rate, habit.completed, habit.expected
            );
        }
        println!();
    }

    // Week by week (month reports)
    if !report.weeks.is_empty() {
        if fun_mode {
            println!("📅 WEEK BY WEEK");
        } else {
            println!("WEEK BY WEEK");
        }
        for week in &report.weeks {
            println!(
                "   {} - {}   {:>3}/{:<3} {:>4}%",
                week.start.format("%b %d"),
                week.end.format("%b %d"),
                week.completed,
                week.expected,
                week.rate
            );
        }
        println!();
    }

    // Monthly targets
    if !report.target_progress.is_empty() {
        if fun_mode {
            println!("🎯 MONTHLY TARGETS");
        } else {
            println!("MONTHLY TARGETS");
        }
        for target in &report.target_progress {
            println!("   {:<24} {}", target.name, target.display());
        }
        println!();
    }

    // Trends
    if let Some(trends) = &report.trends {
        if fun_mode {
            println!("📈 VS PREVIOUS PERIOD");
        } else {
            println!("VS PREVIOUS PERIOD");
        }
        println!(
            "   Rate: {}  │  Completions: {}",
            TrendComparison::format_delta(trends.rate_delta_pct),
            TrendComparison::format_delta(trends.completions_delta_pct),
        );
        println!();
    }

    // Journal highlights
    if !report.journal.is_empty() {
        if fun_mode {
            println!("📓 JOURNAL");
        } else {
            println!("JOURNAL");
        }
        println!(
            "   {} entr{}",
            report.journal.entry_count,
            if report.journal.entry_count == 1 {
                "y"
            } else {
                "ies"
            }
        );
        for win in &report.journal.wins {
            println!("   + {}", win);
        }
        for miss in &report.journal.misses {
            println!("   - {}", miss);
        }
        println!();
    }
}

fn print_markdown(report: &HabitReport, fun_mode: bool) {
    let title = if fun_mode {
        format!("🌟 {} in Review 🌟", report.period.display_name())
    } else {
        format!("Habit Report: {}", report.period.display_name())
    };

    println!("# {}", title);
    println!();

    if report.summary.expected == 0 && report.summary.completed == 0 {
        println!("*No habit activity found for this period.*");
        return;
    }

    if let Some(headline) = report.headline {
        println!("> {}", headline);
        println!();
    }

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Expected | {} |", report.summary.expected);
    println!("| Completed | {} |", report.summary.completed);
    println!("| Rate | {}% |", report.summary.rate);
    println!("| Best streak | {} days |", report.summary.best_streak);
    println!("| Current streak | {} days |", report.summary.current_streak);
    println!();

    // Top Habits
    if !report.top_habits.is_empty() {
        println!("## Top Habits");
        println!();
        for (i, habit) in report.top_habits.iter().enumerate() {
            let emoji = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "  ",
            };
            if fun_mode {
                println!(
                    "{} **{}** - {}% ({}/{})",
                    emoji, habit.name, habit.rate, habit.completed, habit.expected
                );
            } else {
                println!(
                    "{}. **{}** - {}% ({}/{})",
                    i + 1,
                    habit.name,
                    habit.rate,
                    habit.completed,
                    habit.expected
                );
            }
        }
        println!();
    }

    // Week by week
    if !report.weeks.is_empty() {
        println!("## Week by Week");
        println!();
        println!("| Week | Completed | Expected | Rate |");
        println!("|------|-----------|----------|------|");
        for week in &report.weeks {
            println!(
                "| {} - {} | {} | {} | {}% |",
                week.start.format("%b %d"),
                week.end.format("%b %d"),
                week.completed,
                week.expected,
                week.rate
            );
        }
        println!();
    }

    // Monthly targets
    if !report.target_progress.is_empty() {
        println!("## Monthly Targets");
        println!();
        for target in &report.target_progress {
            println!("- **{}** - {}", target.name, target.display());
        }
        println!();
    }

    // Trends
    if let Some(trends) = &report.trends {
        println!("## Trends vs Previous Period");
        println!();
        println!("| Metric | Change |");
        println!("|--------|--------|");
        println!(
            "| Rate | {} |",
            TrendComparison::format_delta(trends.rate_delta_pct)
        );
        println!(
            "| Completions | {} |",
            TrendComparison::format_delta(trends.completions_delta_pct)
        );
        println!();
    }

    // Journal highlights
    if !report.journal.is_empty() {
        println!("## Journal");
        println!();
        for win in &report.journal.wins {
            println!("- **Win:** {}", win);
        }
        for miss in &report.journal.misses {
            println!("- **Miss:** {}", miss);
        }
        println!();
    }

    println!("---");
    println!("*Generated by habitude-report*");
}

fn print_json(report: &HabitReport) -> Result<()> {
    // Convert to a serializable format
    let json = serde_json::json!({
        "period": report.period.display_name(),
        "start": report.summary.start,
        "end": report.summary.end,
        "summary": {
            "expected": report.summary.expected,
            "completed": report.summary.completed,
            "rate": report.summary.rate,
            "best_streak": report.summary.best_streak,
            "current_streak": report.summary.current_streak,
        },
        "habits": report.summary.habits,
        "top_habits": report.top_habits.iter().map(|h| {
            serde_json::json!({"name": h.name, "rate": h.rate, "completed": h.completed, "expected": h.expected})
        }).collect::<Vec<_>>(),
        "weeks": report.weeks,
        "targets": report.target_progress.iter().map(|t| {
            serde_json::json!({"name": t.name, "completed": t.completed, "target": t.target})
        }).collect::<Vec<_>>(),
        "headline": report.headline,
        "trends": report.trends.as_ref().map(|t| serde_json::json!({
            "rate_delta_pct": t.rate_delta_pct,
            "completions_delta_pct": t.completions_delta_pct,
        })),
        "journal": {
            "entries": report.journal.entry_count,
            "wins": report.journal.wins,
            "misses": report.journal.misses,
        },
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
