use tables_client::frame::default_start;
use tables_client::{FrameRng, generate_frame};

use crate::config::{FrameArgs, FrameEffective, GlobalArgs};
use crate::error::TablecheckError;

pub async fn run(global: &GlobalArgs, args: &FrameArgs) -> Result<(), TablecheckError> {
    let (cfg, client) = super::prepare(global)?;
    let eff = FrameEffective::new(args, &cfg.frame);

    let mut rng = FrameRng::new(eff.seed);
    let frame = generate_frame(eff.rows, &["val1", "val2"], default_start(), &mut rng);
    let outcome = client.post_frame(frame.text).await;

    if !outcome.is_success() {
        return Err(TablecheckError::WriteFailures { failed: 1, total: 1 });
    }
    Ok(())
}
