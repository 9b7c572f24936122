use anyhow::Result;
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use stagehand_core::{
    batch::{BatchEnv, BatchEnvConfig},
    hook::{ComposedHook, EveryNSteps, TotalBatchOriginalRewardPerEpisode},
    Env, RandomPolicy, Runner, RunnerConfig, StopAfterStep,
};
use stagehand_frame::{wrap_frames, CatchConfig, CatchEnv, FrameConfig, FrameEnv};

const N_REPLICAS: u64 = 8;
const MAX_STEPS: usize = 2_000;

type Replica = FrameEnv<CatchEnv>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frame_config = FrameConfig::default();
    let replicas = (0..N_REPLICAS)
        .map(|i| {
            let config = CatchConfig::default().seed(42 + i);
            wrap_frames(CatchEnv::build(&config)?, &frame_config)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut env = BatchEnv::build(replicas, &BatchEnvConfig::default().parallel(true))?;
    let mut policy = RandomPolicy::new(env.action_space(), SmallRng::seed_from_u64(0));

    let mut hook = ComposedHook::new((
        TotalBatchOriginalRewardPerEpisode::default(),
        EveryNSteps::new(500, |step, _: &_, env: &BatchEnv<Replica>| {
            let state = env.state()?;
            info!("step {}: stacked frames of shape {:?}", step, state.shape());
            Ok(())
        })?,
    ));

    let progress = Runner::build(RunnerConfig::default().log_interval(250)).run(
        &mut policy,
        &mut env,
        &mut StopAfterStep(MAX_STEPS),
        &mut hook,
    )?;

    let (tracker, _) = hook.into_inner();
    let totals = (0..N_REPLICAS as usize)
        .flat_map(|i| tracker.history(i).to_vec())
        .collect::<Vec<_>>();
    let mean = totals.iter().sum::<f32>() / totals.len().max(1) as f32;
    info!(
        "{} steps, {} episodes over {} replicas, mean return = {:.3}",
        progress.steps,
        totals.len(),
        N_REPLICAS,
        mean
    );

    Ok(())
}
