//! Example: preview uploaded fonts from the command line
//!
//! Usage: cargo run -p typelab-engine --example preview -- FONT... [--text TEXT]

use tracing_subscriber::EnvFilter;
use typelab_engine::fonts::{DiskFile, FontDbTable};
use typelab_engine::style::SampleText;
use typelab_engine::{Intent, LogNotices, Session};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut paths = Vec::new();
    let mut text = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--text" {
            text = Some(args.next().ok_or_else(|| anyhow::anyhow!("--text needs a value"))?);
        } else {
            paths.push(DiskFile::new(arg));
        }
    }

    let mut session = Session::new(FontDbTable::with_system_fonts());
    let report = smol::block_on(session.upload(paths, &mut LogNotices));
    println!(
        "Loaded {} font(s), skipped {}, failed {}",
        report.registered.len(),
        report.skipped.len(),
        report.failures.len()
    );

    for font in session.fonts() {
        println!("  {} .{}  ({})", font.display_name(), font.format(), font.family_handle());
    }

    session.dispatch(match text {
        Some(text) => Intent::EditText(text),
        None => Intent::UseSample(SampleText::Heading),
    });

    let style = session.style();
    println!("{}", style.to_css());
    println!("{} | {}", style.source_label, style.footer());

    session.teardown();
    Ok(())
}
