//! Loop Dash headless runner
//!
//! Plays runs without a window, either with the built-in autopilot or a fixed
//! flap rhythm, and persists outcomes like the real game would.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use loop_dash::audio::NullSound;
    use loop_dash::persistence::KvStore;
    use loop_dash::platform::{self, PlatformStore};
    use loop_dash::sim::{Viewport, autopilot};
    use loop_dash::{QualityPreset, RunStatus, Session, Settings, Tuning};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "loop-dash", version, about = "Run Loop Dash headless")]
    struct Args {
        /// RNG seed for the first run (later runs count up from it)
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Number of runs to play
        #[arg(long, default_value_t = 1)]
        runs: u32,

        /// Frame limit per run
        #[arg(long, default_value_t = 36_000)]
        frames: u64,

        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        #[arg(long, default_value_t = 720.0)]
        height: f32,

        /// Directory for saved progress (memory only when omitted)
        #[arg(long)]
        store: Option<PathBuf>,

        /// JSON file overriding gameplay tuning
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Flap every N frames instead of using the autopilot
        #[arg(long, conflicts_with = "autopilot")]
        flap_every: Option<u64>,

        /// Let the autopilot play (default when no rhythm is given)
        #[arg(long)]
        autopilot: bool,

        /// Quality preset (low, medium, high), saved with the other settings
        #[arg(long, value_parser = parse_quality)]
        quality: Option<QualityPreset>,

        /// Forget saved progress before playing
        #[arg(long)]
        reset: bool,
    }

    fn parse_quality(s: &str) -> Result<QualityPreset, String> {
        QualityPreset::parse(s).ok_or_else(|| format!("unknown quality preset '{s}'"))
    }

    enum Pilot {
        Auto,
        Every(u64),
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let args = Args::parse();

        if args.width <= 0.0 || args.height <= 0.0 {
            bail!("viewport must be positive, got {}x{}", args.width, args.height);
        }

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let store = PlatformStore::open(args.store.as_deref())
            .context("opening progress store")?;
        let settings = Settings::load(&store);

        let pilot = match (args.autopilot, args.flap_every) {
            (true, _) | (false, None) => Pilot::Auto,
            (false, Some(0)) => bail!("--flap-every must be at least 1"),
            (false, Some(n)) => Pilot::Every(n),
        };

        let viewport = Viewport::new(args.width, args.height);
        let mut session = Session::new(viewport, args.seed, tuning, settings, store, NullSound);
        if args.reset {
            session.forget_progress();
        }
        if let Some(preset) = args.quality {
            let mut settings = session.settings().clone();
            settings.apply_preset(preset);
            session.update_settings(settings);
        }

        for run in 0..args.runs {
            let seed = args.seed.wrapping_add(run as u64);
            if run > 0 {
                session.restart(seed);
            }
            play(&mut session, &pilot, args.frames);

            let hud = session.hud();
            match session.status() {
                RunStatus::GameOver { score, new_best } => {
                    let cause = session
                        .mistakes()
                        .latest()
                        .map(|m| m.cause.clone())
                        .unwrap_or_default();
                    println!(
                        "run {:>3}  seed {:<6} score {:>5}  {:<20} cause {:<12} {}",
                        run + 1,
                        seed,
                        score,
                        hud.stage.label(),
                        cause,
                        if new_best { "NEW BEST" } else { "" }
                    );
                }
                RunStatus::Playing => {
                    println!(
                        "run {:>3}  seed {:<6} score {:>5}  {:<20} survived {} frames",
                        run + 1,
                        seed,
                        hud.score,
                        hud.stage.label(),
                        args.frames
                    );
                }
            }
        }

        let mistakes = session.mistakes();
        println!();
        println!("best score      {}", session.best_score());
        println!("logged deaths   {}", mistakes.len());
        if let Some(cause) = mistakes.dominant_cause() {
            println!("usual killer    {}", cause);
        }
        println!("quality         {}", session.settings().quality.as_str());
        println!("feedback        {}", session.feedback_message());
        Ok(())
    }

    fn play<S: KvStore>(session: &mut Session<S, NullSound>, pilot: &Pilot, frames: u64) {
        for frame in 0..frames {
            let now = frame as f64 * FRAME_MS;
            let wants = match pilot {
                Pilot::Auto => autopilot::wants_trigger(session.state()),
                Pilot::Every(n) => frame % n == 0,
            };
            if wants {
                session.trigger(now);
            }
            if session.frame(now).ended.is_some() {
                return;
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `loop_dash::Session` directly
}
