use goemotions_korean::{GoEmotionsArgs, VisibleDevices, evaluate_file, init_logger, set_seed};
use ortho_config::OrthoConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = GoEmotionsArgs::load()?;
    init_logger(args.log_level())?;

    let spec = args.model_variant().spec();
    tracing::info!(
        model_type = %spec.variant,
        checkpoint = spec.default_checkpoint,
        tokenizer = ?spec.tokenizer,
        "resolved model variant"
    );
    let rngs = set_seed(&args, &VisibleDevices);
    tracing::debug!(gpu_seeded = rngs.gpu_seeded(), "random number streams ready");

    if let Some(path) = &args.predictions {
        let metrics = evaluate_file(path)?;
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }
    Ok(())
}
