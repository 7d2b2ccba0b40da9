use std::path::PathBuf;

use anyhow::{Context, Result};

use lineup_scraper::config::load_dotenv;
use lineup_scraper::fitness::{SquadIndex, fetch_lexicon, mark_file, mark_squad_file};
use lineup_scraper::logging;

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: fitness_check <file> [squad_file]")?;
    let squad_path = args.next().map(PathBuf::from);

    let lexicon = fetch_lexicon()?;
    mark_file(&path, &lexicon)?;

    println!("Availability check complete");
    println!("File: {}", path.display());
    println!("Players listed: {}", lexicon.len());

    if let Some(squad_path) = squad_path {
        let squads = SquadIndex::load(&squad_path)?;
        mark_squad_file(&path, &squads)?;
        println!("Squad check against {} ({} team keys)", squad_path.display(), squads.team_count());
    }
    Ok(())
}
