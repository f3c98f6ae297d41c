//! Generate command: sample the five generated entity pools.

use super::{ensure_dir, setup};
use crate::gen;
use crate::io::{read_currency_list, read_name_table, read_unit_list, write_entity_csv};
use crate::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Target size of the PERCENT pool.
const PERCENT_COUNT: usize = 150;

/// First-name frequency files carry two leading metadata lines.
const FIRST_NAME_SKIP: usize = 2;

/// Generate entity value pools
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Directory with the source lists: money.csv, quantity.csv,
    /// first_names_female.txt, first_names_male.txt, last_names.txt
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory for the generated pools
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Pipeline config file (JSON); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let (config, mut rng) = setup(args.config.as_ref(), args.seed)?;
    ensure_dir(&args.out)?;

    let currencies = read_currency_list(&args.input.join("money.csv"))?;
    let units = read_unit_list(&args.input.join("quantity.csv"))?;
    let female = read_name_table(
        &args.input.join("first_names_female.txt"),
        FIRST_NAME_SKIP,
    )?;
    let male = read_name_table(&args.input.join("first_names_male.txt"), FIRST_NAME_SKIP)?;
    let last = read_name_table(&args.input.join("last_names.txt"), 0)?;

    let dates = gen::generate_date_pool(&config.dates, &mut rng)?;
    let money = gen::generate_money_pool(&currencies, &mut rng)?;
    let percent = gen::generate_percent_pool(PERCENT_COUNT, &mut rng);
    let quantity = gen::generate_quantity_pool(&units, &mut rng)?;
    let persons = gen::generate_person_pool(
        female,
        male,
        last,
        &config.names,
        &config.person_pattern_counts,
        &mut rng,
    )?;

    for (name, pool) in [
        ("DATE.csv", &dates),
        ("MONEY.csv", &money),
        ("PERCENT.csv", &percent),
        ("QUANTITY.csv", &quantity),
        ("PERSON.csv", &persons),
    ] {
        write_entity_csv(&args.out.join(name), pool)?;
        info!(file = name, entities = pool.len(), "pool written");
    }
    Ok(())
}
