//! Command implementations: prompts, parsing, and printed output.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::warn;

use dominion_core::models::{
    optional_text, parse_optional_field, ExerciseFilter, ProgressDraft, RegisterProfile,
    SkillLevel, WorkoutDraft, WorkoutExercise,
};
use dominion_core::{CredentialStore, Dominion};

use crate::output;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

fn prompt_password() -> Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}

// ============================================================================
// Account
// ============================================================================

pub async fn login(dominion: &mut Dominion) -> Result<()> {
    println!("\n=== Dominion Login ===\n");

    let email = match dominion.config().last_email.clone() {
        Some(last) => prompt_with_default("Email", &last)?,
        None => prompt("Email")?,
    };
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }

    // Password from env var (for scripted use), the keychain, or a prompt.
    let password = match std::env::var("DOMINION_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => {
            if CredentialStore::has_credentials(&email) {
                let answer = prompt("Use stored password? [Y/n]")?;
                if answer.to_lowercase() != "n" {
                    CredentialStore::get_password(&email)?
                } else {
                    prompt_password()?
                }
            } else {
                prompt_password()?
            }
        }
    };

    println!("\nSigning in...");
    let user = dominion.login(&email, &password).await?;
    if let Err(e) = dominion.config().save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Signed in as {} ({} points)", user.display_name(), user.points);
    Ok(())
}

pub async fn register(dominion: &mut Dominion) -> Result<()> {
    println!("\n=== Create a Dominion account ===\n");
    println!("Optional fields can be left blank.\n");

    let username = prompt("Username")?;
    let email = prompt("Email")?;
    let full_name = prompt("Full name")?;
    if username.is_empty() || email.is_empty() {
        anyhow::bail!("Username and email are required");
    }
    let password = prompt_password()?;

    let age = parse_optional_field(&prompt("Age (optional)")?)
        .map_err(|_| anyhow::anyhow!("Age must be a whole number"))?;
    let height = parse_optional_field(&prompt("Height in cm (optional)")?)
        .map_err(|_| anyhow::anyhow!("Height must be a number"))?;
    let weight = parse_optional_field(&prompt("Weight in kg (optional)")?)
        .map_err(|_| anyhow::anyhow!("Weight must be a number"))?;
    let university = optional_text(&prompt("University (optional)")?);
    let city = optional_text(&prompt("City (optional)")?);

    let profile = RegisterProfile {
        username,
        email,
        password,
        full_name,
        age,
        height,
        weight,
        university,
        city,
    };

    println!("\nCreating account...");
    let user = dominion.register(&profile).await?;
    if let Err(e) = dominion.config().save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Welcome, {}!", user.display_name());
    Ok(())
}

pub fn logout(dominion: &Dominion) -> Result<()> {
    dominion.logout();
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(dominion: &Dominion) -> Result<()> {
    let user = dominion.profile().await?;
    println!("{} <{}>", user.display_name(), user.email);
    println!("  username:   {}", user.username);
    if let Some(age) = user.age {
        println!("  age:        {}", age);
    }
    if let Some(height) = user.height {
        println!("  height:     {} cm", height);
    }
    if let Some(weight) = user.weight {
        println!("  weight:     {} kg", weight);
    }
    println!("  university: {}", output::optional_display(&user.university));
    println!("  city:       {}", output::optional_display(&user.city));
    println!("  level:      {}", user.fitness_level);
    println!("  points:     {}", user.points);
    println!("  streak:     {} days", user.streak_count);
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

fn parse_exercise_filter(args: &[String]) -> Result<ExerciseFilter> {
    let mut filter = ExerciseFilter::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--pillar" => {
                let value = args
                    .get(i + 1)
                    .context("--pillar needs a value, e.g. --pillar \"Horizontal Pull\"")?;
                filter.pillar = Some(value.clone());
                i += 2;
            }
            "--level" => {
                let value = args.get(i + 1).context("--level needs a value")?;
                let level: SkillLevel = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                filter.skill_level = Some(level);
                i += 2;
            }
            other => anyhow::bail!("Unknown option: {}", other),
        }
    }
    Ok(filter)
}

pub async fn exercises(dominion: &Dominion, args: &[String]) -> Result<()> {
    let filter = parse_exercise_filter(args)?;
    let exercises = dominion.exercises(&filter).await?;
    if exercises.is_empty() {
        println!("No exercises match.");
        return Ok(());
    }
    for exercise in &exercises {
        println!(
            "{}  {}  [{} / {}]",
            output::column(&exercise.id, 6),
            output::column(&exercise.name, 32),
            exercise.pillar,
            exercise.skill_level
        );
    }
    println!("\n{} exercises", exercises.len());
    Ok(())
}

pub async fn exercise_detail(dominion: &Dominion, args: &[String]) -> Result<()> {
    let id = args.first().context("Usage: dominion exercise <id>")?;
    let exercise = dominion.exercise(id).await?;

    println!("{} [{} / {}]", exercise.name, exercise.pillar, exercise.skill_level);
    println!("\n{}", exercise.description);
    if !exercise.instructions.is_empty() {
        println!("\nInstructions:");
        for (i, step) in exercise.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    if !exercise.common_mistakes.is_empty() {
        println!("\nCommon mistakes:");
        for mistake in &exercise.common_mistakes {
            println!("  - {}", mistake);
        }
    }
    if !exercise.prerequisites.is_empty() {
        println!("\nPrerequisites: {}", exercise.prerequisites.join(", "));
    }
    if let Some(ref url) = exercise.video_url {
        println!("\nVideo: {}", url);
    }
    Ok(())
}

pub async fn pillars(dominion: &Dominion) -> Result<()> {
    for pillar in dominion.pillars().await? {
        println!("{}", pillar);
    }
    Ok(())
}

pub async fn mobility(dominion: &Dominion) -> Result<()> {
    let exercises = dominion.mobility_exercises().await?;
    for exercise in &exercises {
        println!(
            "{}  {}  [{}]  {}",
            output::column(&exercise.id, 6),
            output::column(&exercise.name, 32),
            exercise.area,
            output::optional_display(&exercise.hold_time)
        );
    }
    println!("\n{} mobility exercises", exercises.len());
    Ok(())
}

pub async fn shop(dominion: &Dominion) -> Result<()> {
    let products = dominion.products().await?;
    for product in &products {
        let stock = if product.in_stock { "" } else { "  (out of stock)" };
        println!(
            "{}  {}  {}{}",
            output::column(&product.id, 6),
            output::column(&product.name, 32),
            product.price_display(),
            stock
        );
    }
    Ok(())
}

pub async fn communities(dominion: &Dominion) -> Result<()> {
    for community in dominion.communities().await? {
        println!(
            "{}  {}  [{}]  {} members",
            output::column(&community.id, 6),
            output::column(&community.name, 28),
            community.kind,
            community.member_count()
        );
    }
    Ok(())
}

pub async fn messages(dominion: &Dominion, args: &[String]) -> Result<()> {
    let id = args
        .first()
        .context("Usage: dominion messages <community-id>")?;
    for message in dominion.community_messages(id).await? {
        println!(
            "[{}] {}: {}",
            output::format_date(&message.timestamp),
            message.username,
            message.content
        );
    }
    Ok(())
}

pub async fn leaderboard(dominion: &Dominion) -> Result<()> {
    for entry in dominion.leaderboard().await? {
        println!(
            "{:>3}. {}  {:>6} pts  {}",
            entry.rank,
            output::column(&entry.username, 20),
            entry.points,
            output::truncate(&format!("{} {}", entry.university, entry.city), 36)
        );
    }
    Ok(())
}

pub async fn challenges(dominion: &Dominion) -> Result<()> {
    for challenge in dominion.challenges().await? {
        println!(
            "{}  {}  {} {} by {}  ({} joined)",
            output::column(&challenge.id, 6),
            output::column(&challenge.name, 28),
            challenge.goal_value,
            challenge.goal_type,
            output::format_date(&challenge.end_date),
            challenge.participants.len()
        );
    }
    Ok(())
}

// ============================================================================
// Training
// ============================================================================

fn parse_progress_draft(args: &[String]) -> Result<ProgressDraft> {
    let exercise_id = args.first().context(
        "Usage: dominion log <exercise-id> [--reps N] [--sets N] [--hold SECS] [--weight KG] [--notes TEXT]",
    )?;
    let mut draft = ProgressDraft::new(exercise_id.clone());

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .with_context(|| format!("{} needs a value", flag))?;
        match flag {
            "--reps" => draft.reps = Some(value.parse().context("--reps must be a whole number")?),
            "--sets" => draft.sets = Some(value.parse().context("--sets must be a whole number")?),
            "--hold" => {
                draft.hold_time = Some(value.parse().context("--hold must be a number of seconds")?)
            }
            "--weight" => {
                draft.weight = Some(value.parse().context("--weight must be a number")?)
            }
            "--notes" => draft.notes = Some(value.clone()),
            other => anyhow::bail!("Unknown option: {}", other),
        }
        i += 2;
    }
    Ok(draft)
}

pub async fn log_progress(dominion: &Dominion, args: &[String]) -> Result<()> {
    let draft = parse_progress_draft(args)?;
    let entry = dominion.log_progress(&draft).await?;
    println!(
        "Logged {} on {}.",
        entry.exercise_id,
        output::format_date(&entry.date)
    );
    Ok(())
}

pub async fn progress(dominion: &Dominion, args: &[String]) -> Result<()> {
    let entries = match args.first() {
        Some(exercise_id) => dominion.exercise_progress(exercise_id).await?,
        None => dominion.progress().await?,
    };
    if entries.is_empty() {
        println!("Nothing logged yet.");
        return Ok(());
    }
    for entry in &entries {
        let mut parts = Vec::new();
        if let Some(sets) = entry.sets {
            parts.push(format!("{} sets", sets));
        }
        if let Some(reps) = entry.reps {
            parts.push(format!("{} reps", reps));
        }
        if let Some(hold) = entry.hold_time {
            parts.push(format!("{}s hold", hold));
        }
        if let Some(weight) = entry.weight {
            parts.push(format!("{} kg", weight));
        }
        println!(
            "{}  {}  {}  {}",
            output::format_date(&entry.date),
            output::column(&entry.exercise_id, 6),
            output::column(&parts.join(", "), 30),
            output::optional_display(&entry.notes)
        );
    }
    Ok(())
}

pub async fn plan(dominion: &Dominion, args: &[String]) -> Result<()> {
    let usage = "Usage: dominion plan <name> <exercise-id>... [--duration MIN]";
    let name = args.first().context(usage)?.clone();

    let mut exercises = Vec::new();
    let mut duration = None;
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--duration" {
            let value = args.get(i + 1).context("--duration needs a value")?;
            duration = Some(value.parse().context("--duration must be minutes")?);
            i += 2;
        } else {
            exercises.push(WorkoutExercise {
                exercise_id: args[i].clone(),
                name: None,
                sets: None,
                reps: None,
                hold_time: None,
            });
            i += 1;
        }
    }
    if exercises.is_empty() {
        anyhow::bail!(usage);
    }

    let draft = WorkoutDraft {
        name,
        exercises,
        scheduled_date: None,
        duration,
    };
    let workout = dominion.create_workout(&draft).await?;
    println!(
        "Created workout \"{}\" with {} exercises.",
        workout.name,
        workout.exercises.len()
    );
    Ok(())
}

pub async fn workouts(dominion: &Dominion) -> Result<()> {
    let workouts = dominion.workouts().await?;
    if workouts.is_empty() {
        println!("No workouts yet - create one with `dominion plan`.");
        return Ok(());
    }
    for workout in &workouts {
        let duration = workout
            .duration
            .map(|d| format!("{} min", d))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {} exercises  {}",
            output::column(&workout.id, 6),
            output::column(&workout.name, 28),
            workout.exercises.len(),
            duration
        );
    }
    Ok(())
}

pub async fn stats(dominion: &Dominion) -> Result<()> {
    let analytics = dominion.progress_analytics().await?;
    println!("Last 30 days:");
    println!("  entries logged:  {}", analytics.total_workouts);
    println!("  days trained:    {}", analytics.unique_workout_days);
    println!("  this week:       {}", analytics.weekly_progress);
    println!("  current streak:  {} days", analytics.current_streak);
    if !analytics.most_practiced_exercises.is_empty() {
        println!("  most practiced:");
        for (exercise_id, count) in &analytics.most_practiced_exercises {
            println!("    {}  x{}", exercise_id, count);
        }
    }
    Ok(())
}

pub async fn join(dominion: &Dominion, args: &[String]) -> Result<()> {
    let usage = "Usage: dominion join <community|challenge> <id>";
    let kind = args.first().context(usage)?;
    let id = args.get(1).context(usage)?;
    match kind.as_str() {
        "community" => {
            dominion.join_community(id).await?;
            println!("Joined community {}.", id);
        }
        "challenge" => {
            dominion.join_challenge(id).await?;
            println!("Joined challenge {}.", id);
        }
        other => anyhow::bail!("Unknown join target: {} ({})", other, usage),
    }
    Ok(())
}
