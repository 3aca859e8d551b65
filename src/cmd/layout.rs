use crate::reports;
use airkeys::config::ClientConfig;
use airkeys::error::ClResult;
use airkeys_core::layout::KeyboardLayout;
use clap::Args;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Emit the key regions as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &LayoutArgs, config: &ClientConfig) -> ClResult<()> {
    let layout = KeyboardLayout::generate(&config.layout);

    if let Some((a, b)) = layout.first_overlap() {
        warn!("⚠️  Keys '{}' and '{}' overlap; hit testing will favour '{}'", a.label, b.label, a.label);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(layout.regions())?);
    } else {
        reports::print_layout(&layout);
    }
    Ok(())
}
