//! Run a [`Policy`] on an [`Env`].
mod config;
mod stop;
use crate::{
    hook::{Hook, Stage},
    Env, Policy, Terminal,
};
use anyhow::Result;
pub use config::RunnerConfig;
use log::{debug, info, trace};
use std::time::Instant;
pub use stop::{Progress, StopAfterEpisode, StopAfterStep, StopCondition};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs the interaction loop between a policy and an environment.
///
/// # Run loop
///
/// [`Runner::run()`] does the following:
///
/// 1. Call hooks at [`Stage::PreExperiment`], reset [`Env`], call hooks at
///    [`Stage::PreEpisode`].
/// 2. Read the state with [`Env::state`] and select an action with
///    [`Policy::select_action`].
/// 3. Call hooks at [`Stage::PreAct`], apply the action with [`Env::act`],
///    `steps += 1`, call hooks at [`Stage::PostAct`].
/// 4. If the termination flag ends the episode (see [`Terminal`]):
///     1. Call hooks at [`Stage::PostEpisode`] and `episodes += 1`.
///     2. Reset [`Env`] and call hooks at [`Stage::PreEpisode`].
/// 5. If the stop condition is satisfied, call hooks at [`Stage::PostExperiment`] and
///    return the final [`Progress`].
/// 6. Back to step 2.
///
/// At every stage, [`Policy::observe`] is called before the hook, so a learner has
/// already updated itself when hooks look at the transition. Hooks always see the
/// environment after the transition they describe. Any error of the policy, the
/// environment or a hook aborts the run and is returned as is.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Policy]-->|Env::Act|B[Env]
///     B -->|Env::State|A
///     B -->|"Stage, &Env"|C[Hook]
///     A -->|"Stage, &Policy"|C
///     D[StopCondition] -->|halt|E[Runner]
///     E -->|Progress|D
/// ```
///
/// [`Runner::run()`]: Runner::run
pub struct Runner {
    /// Interval of logging the progress in environment steps.
    log_interval: usize,

    /// Steps made since the last progress log.
    steps_for_sps: usize,

    /// Start of the current logging interval.
    timer_for_sps: Instant,
}

impl Runner {
    /// Constructs a runner.
    pub fn build(config: RunnerConfig) -> Self {
        Self {
            log_interval: config.log_interval,
            steps_for_sps: 0,
            timer_for_sps: Instant::now(),
        }
    }

    /// Returns environment steps per second, then resets the internal counter.
    fn steps_per_sec(&mut self) -> f32 {
        let elapsed = self.timer_for_sps.elapsed().as_secs_f32();
        let sps = if elapsed > 0.0 {
            self.steps_for_sps as f32 / elapsed
        } else {
            0.0
        };
        self.steps_for_sps = 0;
        self.timer_for_sps = Instant::now();
        sps
    }

    fn notify<E, P, H>(
        stage: Stage,
        progress: &Progress,
        policy: &mut P,
        env: &E,
        hook: &mut H,
    ) -> Result<()>
    where
        E: Env,
        P: Policy<E>,
        H: Hook<P, E> + ?Sized,
    {
        policy.observe(stage, env)?;
        hook.call(stage, progress.steps, policy, env)
    }

    /// Runs `policy` on `env` until `stop` is satisfied.
    ///
    /// The loop makes at least one transition. Returns the counters at the end of
    /// the run.
    pub fn run<E, P, S, H>(
        &mut self,
        policy: &mut P,
        env: &mut E,
        stop: &mut S,
        hook: &mut H,
    ) -> Result<Progress>
    where
        E: Env,
        P: Policy<E>,
        S: StopCondition + ?Sized,
        H: Hook<P, E> + ?Sized,
    {
        let mut progress = Progress::default();
        self.steps_for_sps = 0;
        self.timer_for_sps = Instant::now();
        info!("Start experiment");

        Self::notify(Stage::PreExperiment, &progress, policy, env, hook)?;
        env.reset()?;
        Self::notify(Stage::PreEpisode, &progress, policy, env, hook)?;

        loop {
            let state = env.state()?;
            let act = policy.select_action(&state)?;

            Self::notify(Stage::PreAct, &progress, policy, env, hook)?;
            env.act(&act)?;
            progress.steps += 1;
            self.steps_for_sps += 1;
            trace!("Step {}", progress.steps);
            Self::notify(Stage::PostAct, &progress, policy, env, hook)?;

            if env.is_terminated().ends_episode() {
                Self::notify(Stage::PostEpisode, &progress, policy, env, hook)?;
                progress.episodes += 1;
                debug!(
                    "Episode {} finished at step {}",
                    progress.episodes, progress.steps
                );
                env.reset()?;
                Self::notify(Stage::PreEpisode, &progress, policy, env, hook)?;
            }

            if self.log_interval > 0 && progress.steps % self.log_interval == 0 {
                let sps = self.steps_per_sec();
                info!(
                    "steps = {}, episodes = {}, steps/sec = {:.1}",
                    progress.steps, progress.episodes, sps
                );
            }

            if stop.should_stop(&progress) {
                break;
            }
        }

        Self::notify(Stage::PostExperiment, &progress, policy, env, hook)?;
        info!(
            "Finish experiment: steps = {}, episodes = {}",
            progress.steps, progress.episodes
        );
        Ok(progress)
    }
}
