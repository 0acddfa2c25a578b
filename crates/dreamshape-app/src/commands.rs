use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use dreamshape_app::config::{AppConfig, ENV_REMOTE_KEY, ENV_REMOTE_URL};
use dreamshape_app::confirm::{AssumeYes, Confirm};
use dreamshape_app::error::TrackerError;
use dreamshape_app::export;
use dreamshape_app::sync::{self, SyncReport};
use dreamshape_app::timers::TimerEvent;
use dreamshape_app::tracker::{FinishChoice, Tracker};
use dreamshape_app::writer::{SyncState, last_sync_label};
use dreamshape_auth::client::AuthClient;
use dreamshape_auth::error::AuthError;
use dreamshape_auth::flows::{self, SignUpOutcome, SignUpRequest};
use dreamshape_auth::session::Session;
use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_core::models::workout::{WorkoutLog, WorkoutSet};
use dreamshape_core::session::SetField;
use dreamshape_core::stats;
use dreamshape_core::storage_keys;
use dreamshape_storage::local::LocalStore;
use dreamshape_storage::remote::RemoteStore;
use dreamshape_storage::rest::RestStore;
use eyre::{Result, WrapErr};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use uuid::Uuid;

use crate::cli::{
    AccountCommands, Cli, Commands, ExerciseCommands, FinishArgs, HistoryCommands, ItemRef,
    ProfileCommands, SetArgs, TemplateCommands, WorkoutCommands,
};

/// Prompts on the terminal.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    let store = LocalStore::open(&data_dir)
        .wrap_err_with(|| format!("failed to open data directory {}", data_dir.display()))?;
    let mut tracker = Tracker::open(store, config.default_rest_seconds);

    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    if !matches!(cli.command, Commands::Account(_)) {
        resume_session(&mut tracker, &config).await;
    }
    let result = dispatch(&mut tracker, &config, cli.command, confirm.as_mut()).await;

    tracker.settle().await;
    if let SyncState::Failed { message } = tracker.sync_status().state {
        eprintln!("sync failed: {message} (changes are saved locally)");
    }
    result
}

async fn dispatch(
    tracker: &mut Tracker,
    config: &AppConfig,
    command: Commands,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    match command {
        Commands::Template(cmd) => template(tracker, cmd, confirm),
        Commands::Exercise(cmd) => exercise(tracker, cmd, confirm),
        Commands::Workout(cmd) => workout(tracker, cmd, confirm).await,
        Commands::History(cmd) => history(tracker, cmd, confirm),
        Commands::Stats { heatmap } => {
            print_stats(tracker, heatmap);
            Ok(())
        }
        Commands::Pr { exercise, top } => {
            match exercise {
                Some(name) => println!("{name}: {}", tracker.personal_record(&name)),
                None => {
                    for (name, weight) in tracker.top_personal_records(top) {
                        println!("{weight:>8}  {name}");
                    }
                }
            }
            Ok(())
        }
        Commands::Profile(cmd) => profile(tracker, cmd),
        Commands::Export { dir } => {
            let now = Zoned::now();
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let doc = tracker.export_document(now.timestamp());
            let path = export::write(&dir, &doc, now.date())?;
            println!("exported {} workouts to {}", doc.workouts.len(), path.display());
            Ok(())
        }
        Commands::Account(cmd) => account(tracker, config, cmd).await,
    }
}

/// 1-based position → index.
fn index(position: usize, what: &str) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| eyre::eyre!("{what} numbers start at 1"))
}

fn resolve_ref<T>(items: &[T], item: &ItemRef, id: impl Fn(&T) -> Uuid) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(item) {
        return Ok(uuid);
    }
    let position: usize = item
        .parse()
        .map_err(|_| eyre::eyre!("expected a list number or id, got {item:?}"))?;
    items
        .get(index(position, "list")?)
        .map(id)
        .ok_or_else(|| eyre::eyre!("no entry #{position}"))
}

// ── Templates ─────────────────────────────────────────────────────────────

fn template(tracker: &mut Tracker, cmd: TemplateCommands, confirm: &mut dyn Confirm) -> Result<()> {
    match cmd {
        TemplateCommands::List => {
            if tracker.templates().is_empty() {
                println!("no templates yet");
            }
            for (i, t) in tracker.templates().iter().enumerate() {
                let names: Vec<_> = t.exercises.iter().map(|e| e.name.as_str()).collect();
                println!("{:>3}. {}  ({})", i + 1, t.name, names.join(", "));
            }
        }
        TemplateCommands::Show { template } => {
            let id = resolve_ref(tracker.templates(), &template, |t| t.id)?;
            let t = tracker
                .template(id)
                .ok_or(TrackerError::TemplateNotFound(id))?;
            println!("{}  [{}]", t.name, t.id);
            for (i, ex) in t.exercises.iter().enumerate() {
                println!("{:>3}. {} ({}, {})", i + 1, ex.name, ex.equipment, ex.muscle_group);
            }
            if let Some(notes) = &t.notes {
                println!("notes: {notes}");
            }
        }
        TemplateCommands::Create {
            name,
            exercises,
            notes,
        } => {
            let exercises = exercises
                .iter()
                .map(|n| tracker.resolve_exercise(n))
                .collect::<Result<Vec<_>, _>>()?;
            let created = tracker.create_template(&name, exercises, notes)?;
            println!("created template {} [{}]", created.name, created.id);
        }
        TemplateCommands::Update {
            template,
            name,
            exercises,
            notes,
        } => {
            let id = resolve_ref(tracker.templates(), &template, |t| t.id)?;
            let current = tracker
                .template(id)
                .cloned()
                .ok_or(TrackerError::TemplateNotFound(id))?;
            let exercises = if exercises.is_empty() {
                current.exercises
            } else {
                exercises
                    .iter()
                    .map(|n| tracker.resolve_exercise(n))
                    .collect::<Result<Vec<_>, _>>()?
            };
            let name = name.unwrap_or(current.name);
            let updated = tracker.update_template(id, &name, exercises, notes.or(current.notes))?;
            println!("updated template {}", updated.name);
        }
        TemplateCommands::Delete { template } => {
            let id = resolve_ref(tracker.templates(), &template, |t| t.id)?;
            if tracker.delete_template(id, confirm)? {
                println!("deleted");
            }
        }
    }
    Ok(())
}

// ── Catalog ───────────────────────────────────────────────────────────────

fn exercise(tracker: &mut Tracker, cmd: ExerciseCommands, confirm: &mut dyn Confirm) -> Result<()> {
    match cmd {
        ExerciseCommands::List => {
            for (group, entries) in tracker.catalog().by_muscle_group() {
                println!("{group}");
                for e in entries {
                    println!("  {} ({})", e.name, e.equipment);
                }
            }
        }
        ExerciseCommands::Search { query, limit } => {
            for e in tracker.catalog().suggest(&query, limit) {
                println!("{} ({}, {})", e.name, e.equipment, e.muscle_group);
            }
        }
        ExerciseCommands::Add {
            name,
            muscle_group,
            equipment,
        } => {
            tracker.add_catalog_entry(CatalogEntry::new(name, muscle_group, equipment))?;
            println!("added");
        }
        ExerciseCommands::Remove { name } => {
            if tracker.remove_catalog_entry(&name, confirm)? {
                println!("removed");
            } else {
                println!("nothing removed");
            }
        }
    }
    Ok(())
}

// ── Active workout ────────────────────────────────────────────────────────

async fn workout(
    tracker: &mut Tracker,
    cmd: WorkoutCommands,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    match cmd {
        WorkoutCommands::Start { template } => {
            match template {
                Some(item) => {
                    let id = resolve_ref(tracker.templates(), &item, |t| t.id)?;
                    tracker.start_workout(id)?;
                }
                None => {
                    tracker.start_empty_workout()?;
                }
            }
            print_active(tracker)?;
        }
        WorkoutCommands::Status => print_active(tracker)?,
        WorkoutCommands::Set(SetArgs {
            exercise,
            set,
            weight,
            reps,
        }) => {
            let (ex, s) = (index(exercise, "exercise")?, index(set, "set")?);
            if let Some(w) = weight {
                tracker.update_set(ex, s, SetField::Weight(w))?;
            }
            if let Some(r) = reps {
                tracker.update_set(ex, s, SetField::Reps(r))?;
            }
            print_active(tracker)?;
        }
        WorkoutCommands::Done { exercise, set } => {
            let rest =
                tracker.toggle_set_completed(index(exercise, "exercise")?, index(set, "set")?)?;
            if let Some(rest) = rest {
                println!(
                    "set done; rest {}s (`dreamshape workout timer {exercise}` to count down)",
                    rest.seconds
                );
            }
        }
        WorkoutCommands::Warmup { exercise, set } => {
            let kind = tracker.toggle_set_type(index(exercise, "exercise")?, index(set, "set")?)?;
            println!("set is now {kind:?}");
        }
        WorkoutCommands::AddSet { exercise } => {
            tracker.add_set(index(exercise, "exercise")?)?;
            print_active(tracker)?;
        }
        WorkoutCommands::RemoveSet { exercise, set } => {
            if !tracker.remove_set(index(exercise, "exercise")?, index(set, "set")?)? {
                println!("an exercise keeps at least one set");
            }
            print_active(tracker)?;
        }
        WorkoutCommands::AddExercise { name } => {
            tracker.add_exercise(&name)?;
            print_active(tracker)?;
        }
        WorkoutCommands::RemoveExercise { exercise } => {
            if tracker.remove_exercise(index(exercise, "exercise")?, confirm)? {
                print_active(tracker)?;
            }
        }
        WorkoutCommands::Move { from, to } => {
            tracker.move_exercise(index(from, "exercise")?, index(to, "exercise")?)?;
            print_active(tracker)?;
        }
        WorkoutCommands::Rest { exercise, seconds } => {
            tracker.set_exercise_rest(index(exercise, "exercise")?, seconds)?;
        }
        WorkoutCommands::DefaultRest { seconds } => tracker.set_default_rest(seconds)?,
        WorkoutCommands::Notes { text, exercise } => match exercise {
            Some(ex) => tracker.set_exercise_notes(index(ex, "exercise")?, text)?,
            None => tracker.set_notes(text)?,
        },
        WorkoutCommands::Timer { exercise } => run_rest_timer(tracker, exercise).await?,
        WorkoutCommands::Finish(args) => finish(tracker, args, confirm)?,
        WorkoutCommands::Cancel => {
            if tracker.cancel_workout(confirm)? {
                println!("workout discarded");
            }
        }
    }
    Ok(())
}

async fn run_rest_timer(tracker: &mut Tracker, exercise: usize) -> Result<()> {
    let seconds = tracker.start_rest_timer(index(exercise, "exercise")?)?;
    println!("resting {seconds}s (ctrl-c to skip)");

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(200));
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracker.skip_rest();
                println!("\nrest skipped");
                return Ok(());
            }
        }
        for event in tracker.take_timer_events() {
            match event {
                TimerEvent::RestTick { remaining, .. } => {
                    print!("\rrest {remaining:>3}s ");
                    std::io::stdout().flush()?;
                }
                TimerEvent::RestFinished { .. } => {
                    println!("\rrest over    ");
                    return Ok(());
                }
                TimerEvent::Elapsed { .. } => {}
            }
        }
    }
}

fn finish(tracker: &mut Tracker, args: FinishArgs, confirm: &mut dyn Confirm) -> Result<()> {
    if let Some(changes) = tracker.finish_changes()? {
        if !changes.is_empty() {
            if !changes.added.is_empty() {
                println!("added vs template: {}", changes.added.join(", "));
            }
            if !changes.removed.is_empty() {
                println!("removed vs template: {}", changes.removed.join(", "));
            }
        }
    }
    let choice = match (args.update_template, args.save_as) {
        (true, _) => FinishChoice::UpdateTemplate,
        (false, Some(name)) => FinishChoice::SaveAsNew { name },
        (false, None) => FinishChoice::JustFinish,
    };
    let log = tracker.finish_workout(choice, args.activity.map(Into::into), confirm)?;
    println!(
        "logged {} ({} min, {} kg volume)",
        log.template_name,
        log.duration / 60,
        log.volume()
    );
    Ok(())
}

fn print_sets(sets: &[WorkoutSet]) {
    for (i, s) in sets.iter().enumerate() {
        let mark = if s.completed { "x" } else { " " };
        let kind = if s.is_warmup() { " W" } else { "" };
        println!("     [{mark}] {}. {} x {}{kind}", i + 1, s.weight, s.reps);
    }
}

fn print_active(tracker: &Tracker) -> Result<()> {
    let active = tracker.active().ok_or(TrackerError::NoActiveWorkout)?;
    let elapsed = active.elapsed_seconds(Timestamp::now());
    println!(
        "{}  {:02}:{:02}  (rest {}s)",
        active.template_name,
        elapsed / 60,
        elapsed % 60,
        active.default_rest_seconds
    );
    for (i, ex) in active.exercises.iter().enumerate() {
        let pr = tracker.personal_record(&ex.exercise_name);
        println!("{:>3}. {}  (PR {pr})", i + 1, ex.exercise_name);
        print_sets(&ex.sets);
    }
    Ok(())
}

// ── History ───────────────────────────────────────────────────────────────

fn print_log(log: &WorkoutLog, tz: &TimeZone) {
    let date = log.date.to_zoned(tz.clone()).date();
    println!("{}  {date}  {} min", log.template_name, log.duration / 60);
    for ex in &log.exercises {
        println!("  {}", ex.exercise_name);
        print_sets(&ex.sets);
    }
}

fn history(tracker: &mut Tracker, cmd: HistoryCommands, confirm: &mut dyn Confirm) -> Result<()> {
    let tz = TimeZone::system();
    match cmd {
        HistoryCommands::List => {
            for (i, log) in tracker.workouts().iter().enumerate() {
                let date = log.date.to_zoned(tz.clone()).date();
                println!("{:>3}. {date}  {}  {} min", i + 1, log.template_name, log.duration / 60);
            }
        }
        HistoryCommands::Show { workout } => {
            let id = resolve_ref(tracker.workouts(), &workout, |w| w.id)?;
            print_log(tracker.select_workout(id)?, &tz);
        }
        HistoryCommands::Delete { workout } => {
            let id = resolve_ref(tracker.workouts(), &workout, |w| w.id)?;
            if tracker.delete_workout(id, confirm)? {
                println!("deleted");
            }
        }
    }
    Ok(())
}

fn print_stats(tracker: &Tracker, heatmap: bool) {
    let tz = TimeZone::system();
    let now = Zoned::now();
    let summary = tracker.summary(now.timestamp(), &tz);
    println!("workouts        {}", summary.workout_count);
    println!("streak          {} days", summary.current_streak);
    println!("per week        {:.1}", summary.average_per_week);
    println!("total volume    {}", summary.total_volume);
    println!("weekly goal     {:.0}%", summary.weekly_goal_progress);
    println!("consistency     {:.0}%", summary.consistency_score);
    if let Some(fav) = &summary.favorite_exercise {
        println!("favorite        {fav}");
    }
    println!();
    for bucket in stats::weekly_buckets(tracker.workouts(), now.date(), &tz, stats::CHART_WEEKS) {
        println!(
            "{} → {}  {:>2} workouts  {:>8} volume",
            bucket.start, bucket.end, bucket.workouts, bucket.volume
        );
    }
    if heatmap {
        println!();
        let days = stats::activity_heatmap(tracker.workouts(), now.date(), &tz, stats::HEATMAP_DAYS);
        for week in days.chunks(7) {
            let row: String = week.iter().map(|d| if d.active { '#' } else { '.' }).collect();
            println!("{} {row}", week[0].date);
        }
    }
}

fn profile(tracker: &mut Tracker, cmd: ProfileCommands) -> Result<()> {
    match cmd {
        ProfileCommands::Show => {
            let p = tracker.profile();
            println!("{}  (member since {})", p.name, p.member_since);
            let summary = tracker.summary(Timestamp::now(), &TimeZone::system());
            println!(
                "{} workouts, {} min total, volume {:.0}% of goal",
                summary.workout_count,
                summary.total_duration_seconds / 60,
                summary.volume_progress
            );
        }
        ProfileCommands::Rename { name } => {
            tracker.update_profile_name(&name)?;
            println!("profile renamed to {}", tracker.profile().name);
        }
    }
    Ok(())
}

// ── Account ───────────────────────────────────────────────────────────────

fn auth_client(config: &AppConfig) -> Result<AuthClient> {
    let remote = config.remote.as_ref().ok_or_else(|| {
        eyre::eyre!("no backend configured; set {ENV_REMOTE_URL} and {ENV_REMOTE_KEY}")
    })?;
    Ok(AuthClient::build(&remote.url, &remote.api_key))
}

fn remote_store(config: &AppConfig, session: &Session) -> Result<Arc<dyn RemoteStore>> {
    let remote = config
        .remote
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no backend configured"))?;
    Ok(Arc::new(RestStore::new(
        reqwest::Client::new(),
        &remote.url,
        &remote.api_key,
        &session.access_token,
        session.user_id(),
    )))
}

/// The stored session, refreshed when expired. `None` when signed out or
/// the refresh was rejected.
async fn load_session(tracker: &Tracker, config: &AppConfig) -> Result<Option<Session>> {
    let Some(session) = tracker.store().load::<Session>(storage_keys::SESSION) else {
        return Ok(None);
    };
    if !session.is_expired(Timestamp::now()) {
        return Ok(Some(session));
    }
    let client = auth_client(config)?;
    match flows::refresh(&client, &session.refresh_token).await {
        Ok(fresh) => {
            tracker.store().save(storage_keys::SESSION, &fresh)?;
            Ok(Some(fresh))
        }
        Err(AuthError::TokenExpired) => {
            tracing::warn!("stored session expired; sign in again to sync");
            tracker.store().remove(storage_keys::SESSION)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Reattach the remote writer for a signed-in user. Any failure leaves the
/// tracker local-only.
async fn resume_session(tracker: &mut Tracker, config: &AppConfig) {
    if config.remote.is_none() {
        return;
    }
    let session = match load_session(tracker, config).await {
        Ok(Some(session)) => session,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "could not restore session; working offline");
            return;
        }
    };
    match remote_store(config, &session) {
        Ok(remote) => sync::resume(tracker, remote),
        Err(e) => tracing::warn!(error = %e, "could not connect to backend"),
    }
}

async fn signed_in(tracker: &mut Tracker, config: &AppConfig, session: Session) -> Result<()> {
    tracker.store().save(storage_keys::SESSION, &session)?;
    let remote = remote_store(config, &session)?;
    let report = sync::sign_in_sync(tracker, remote).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.migrated {
        println!(
            "uploaded {} local records ({} failed)",
            report.pushed, report.push_failures
        );
    }
    if report.pulled {
        println!("synced");
    } else {
        println!("could not download remote data; using local data");
    }
}

async fn account(tracker: &mut Tracker, config: &AppConfig, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::SignUp {
            email,
            password,
            name,
            invite_code,
        } => {
            if config.invite_code.trim().is_empty() {
                return Err(eyre::eyre!("sign-up is closed: no invite_code is configured"));
            }
            let client = auth_client(config)?;
            let request = SignUpRequest {
                email,
                password,
                name,
            };
            match flows::sign_up(&client, &request, &invite_code, &config.invite_code).await? {
                SignUpOutcome::SignedIn(session) => signed_in(tracker, config, session).await?,
                SignUpOutcome::ConfirmationSent => {
                    println!("check your email to confirm the account, then sign in");
                }
            }
        }
        AccountCommands::SignIn { email, password } => {
            let client = auth_client(config)?;
            let session = flows::sign_in(&client, &email, &password).await?;
            signed_in(tracker, config, session).await?;
        }
        AccountCommands::SignOut => {
            if let Some(session) = tracker.store().load::<Session>(storage_keys::SESSION) {
                match auth_client(config) {
                    Ok(client) => {
                        if let Err(e) = flows::sign_out(&client, &session).await {
                            tracing::warn!(error = %e, "server sign-out failed");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "skipping server sign-out"),
                }
            }
            tracker.store().remove(storage_keys::SESSION)?;
            tracker.detach_remote();
            println!("signed out");
        }
        AccountCommands::Status => match tracker.store().load::<Session>(storage_keys::SESSION) {
            Some(session) => {
                let who = session.user.email.as_deref().unwrap_or("unknown email");
                println!("signed in as {who}");
                let label =
                    last_sync_label(tracker.last_synced(), Timestamp::now(), &TimeZone::system());
                println!("last sync: {label}");
            }
            None => println!("signed out (local only)"),
        },
        AccountCommands::Sync => {
            let session = load_session(tracker, config)
                .await?
                .ok_or_else(|| eyre::eyre!("not signed in"))?;
            let remote = remote_store(config, &session)?;
            let report = sync::sign_in_sync(tracker, remote).await?;
            print_report(&report);
        }
    }
    Ok(())
}
