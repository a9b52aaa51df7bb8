use chrono::{Days, Local};
use habitude_core::{Database, HabitCategory, Schedule};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("habitude/data.db")
    }

    fn open_db(&self) -> Database {
        let db = Database::open(&self.db_path()).expect("failed to open db");
        db.migrate().expect("failed to migrate db");
        db
    }
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("habitude"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute habitude: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "habitude {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn add_creates_habit_and_list_shows_it() {
    let env = CliTestEnv::new();

    let args = [
        "add",
        "Meditate",
        "--category",
        "wellness",
        "--after",
        "pour my coffee",
        "--then",
        "sit for two minutes",
    ];
    let output = run(&env, &args);
    assert_success(&args, &output);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Added 'Meditate'"), "got:\n{stdout}");
    assert!(
        stdout.contains("After I pour my coffee, I will sit for two minutes."),
        "identity statement missing, got:\n{stdout}"
    );

    let list = run(&env, &["list"]);
    assert_success(&["list"], &list);
    let stdout = stdout_of(&list);
    assert!(stdout.contains("Meditate"));
    assert!(stdout.contains("every day"));
    assert!(stdout.contains("Building"));

    // The stored habit carries the category and cues
    let db = env.open_db();
    let habits = db.list_habits().expect("failed to list habits");
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].category, HabitCategory::Wellness);
    assert_eq!(habits[0].stacking_cue.as_deref(), Some("pour my coffee"));
}

#[test]
fn weekly_add_requires_days() {
    let env = CliTestEnv::new();

    let args = ["add", "Gym", "--schedule", "weekly"];
    let output = run(&env, &args);
    assert!(!output.status.success(), "weekly without --days should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--days"), "got:\n{stderr}");

    let args = ["add", "Gym", "--schedule", "weekly", "--days", "1,3,5"];
    let output = run(&env, &args);
    assert_success(&args, &output);

    let db = env.open_db();
    let habits = db.list_habits().expect("failed to list habits");
    assert_eq!(
        habits[0].schedule,
        Schedule::Weekly {
            target_days: vec![1, 3, 5]
        }
    );
}

#[test]
fn toggle_marks_and_unmarks_today() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Read"]);

    let output = run(&env, &["toggle", "Read"]);
    assert_success(&["toggle", "Read"], &output);
    assert!(stdout_of(&output).contains("Marked 'Read' done"));

    let today_view = run(&env, &["today"]);
    assert_success(&["today"], &today_view);
    let stdout = stdout_of(&today_view);
    assert!(stdout.contains("[x] Read"), "got:\n{stdout}");
    assert!(stdout.contains("1/1 done today."), "got:\n{stdout}");

    let output = run(&env, &["toggle", "Read"]);
    assert_success(&["toggle", "Read"], &output);
    assert!(stdout_of(&output).contains("Unmarked 'Read'"));

    let today_view = run(&env, &["today"]);
    let stdout = stdout_of(&today_view);
    assert!(stdout.contains("[ ] Read"), "got:\n{stdout}");
    assert!(stdout.contains("0/1 done today."), "got:\n{stdout}");
}

#[test]
fn toggle_rejects_future_dates() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Read"]);

    let tomorrow = Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap()
        .to_string();
    let args = ["toggle", "Read", "--date", &tomorrow];
    let output = run(&env, &args);
    assert!(!output.status.success(), "future toggle should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("future"), "got:\n{stderr}");
}

#[test]
fn backfilling_five_days_fires_milestone_once() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Pushups"]);

    let today = Local::now().date_naive();
    for back in (1..=4u64).rev() {
        let date = today.checked_sub_days(Days::new(back)).unwrap().to_string();
        let args = ["toggle", "Pushups", "--date", &date];
        let output = run(&env, &args);
        assert_success(&args, &output);
        assert!(
            !stdout_of(&output).contains("5-day streak!"),
            "milestone fired before the streak reached 5"
        );
    }

    let output = run(&env, &["toggle", "Pushups"]);
    assert_success(&["toggle", "Pushups"], &output);
    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("Pushups: 5-day streak! 🎉"),
        "expected milestone celebration, got:\n{stdout}"
    );

    // Seen milestones stay quiet afterwards
    let today_view = run(&env, &["today"]);
    assert_success(&["today"], &today_view);
    assert!(
        !stdout_of(&today_view).contains("5-day streak!"),
        "milestone should only fire once"
    );
}

#[test]
fn list_json_is_parseable() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Read"]);
    run(&env, &["toggle", "Read"]);

    let output = run(&env, &["list", "--json"]);
    assert_success(&["list", "--json"], &output);

    let habits: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list --json should emit valid JSON");
    let rows = habits.as_array().expect("expected a JSON array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Read");
    assert_eq!(rows[0]["streak"], 1);
    assert_eq!(rows[0]["completed_today"], true);
}

#[test]
fn custom_category_roundtrip_and_reassignment() {
    let env = CliTestEnv::new();

    let args = ["categories", "add", "Guitar", "--color", "hsl(200 80% 50%)"];
    let output = run(&env, &args);
    assert_success(&args, &output);

    let list = run(&env, &["categories", "list"]);
    let stdout = stdout_of(&list);
    assert!(stdout.contains("Guitar"));
    assert!(stdout.contains("Health & Fitness"), "presets missing:\n{stdout}");

    run(&env, &["add", "Practice scales", "--category", "Guitar"]);

    let output = run(&env, &["categories", "rm", "Guitar"]);
    assert_success(&["categories", "rm", "Guitar"], &output);
    assert!(stdout_of(&output).contains("1 habit(s) moved to Productivity"));

    let db = env.open_db();
    let habits = db.list_habits().expect("failed to list habits");
    assert_eq!(habits[0].category, HabitCategory::Productivity);
    assert_eq!(habits[0].custom_category, None);
}

#[test]
fn journal_write_and_show() {
    let env = CliTestEnv::new();

    let args = [
        "journal",
        "write",
        "solid day",
        "--win",
        "read before bed",
        "--miss",
        "skipped the gym",
    ];
    let output = run(&env, &args);
    assert_success(&args, &output);

    let show = run(&env, &["journal", "show"]);
    assert_success(&["journal", "show"], &show);
    let stdout = stdout_of(&show);
    assert!(stdout.contains("solid day"));
    assert!(stdout.contains("+ read before bed"));
    assert!(stdout.contains("- skipped the gym"));
}

#[test]
fn rate_records_weekly_rating() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Read"]);

    let output = run(&env, &["rate", "Read", "3"]);
    assert_success(&["rate", "Read", "3"], &output);
    assert!(stdout_of(&output).contains("Rated 'Read' 3 (Moderate)"));

    let db = env.open_db();
    let ratings = db.list_ratings().expect("failed to list ratings");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].rating, 3);

    // Out-of-range ratings are rejected by the store
    let output = run(&env, &["rate", "Read", "9"]);
    assert!(!output.status.success(), "rating 9 should fail");
}

#[test]
fn stats_shows_habit_detail() {
    let env = CliTestEnv::new();
    run(&env, &["add", "Read", "--two-minute", "open the book"]);
    run(&env, &["toggle", "Read"]);

    let output = run(&env, &["stats", "Read"]);
    assert_success(&["stats", "Read"], &output);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Streak:         1 days"), "got:\n{stdout}");
    assert!(stdout.contains("Completions:    1"), "got:\n{stdout}");
    assert!(stdout.contains("Two-minute:     open the book"));
    assert!(
        stdout.contains("Next milestone: 5 days (4 to go)"),
        "got:\n{stdout}"
    );
}

#[test]
fn unknown_habit_fails_with_clear_message() {
    let env = CliTestEnv::new();

    let output = run(&env, &["toggle", "Ghost"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no habit matching 'Ghost'"), "got:\n{stderr}");
}
