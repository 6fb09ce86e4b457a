//! fraud-runner: headless fraud-signal analysis over one ledger.
//!
//! Usage:
//!   fraud-runner --data-dir ./data
//!   fraud-runner --synthetic --seed 12345 --count 5000
//!   fraud-runner --data-dir ./data --config thresholds.json --tables

use anyhow::{Context, Result};
use fraudscope_core::{
    config::AnalysisConfig,
    engine::AnalysisEngine,
    ledger::{Card, CardHolder, Dimensions, Merchant, MerchantCategory, RawTransaction},
    synthetic::{SyntheticLedger, SyntheticParams},
};
use serde::de::DeserializeOwned;
use std::env;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CardHolderRow {
    id:   u64,
    name: String,
}

#[derive(serde::Deserialize)]
struct CreditCardRow {
    card:           String,
    id_card_holder: u64,
}

#[derive(serde::Deserialize)]
struct MerchantRow {
    id:                   u64,
    name:                 String,
    id_merchant_category: u64,
}

#[derive(serde::Deserialize)]
struct MerchantCategoryRow {
    id:   u64,
    name: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let synthetic = args.iter().any(|a| a == "--synthetic");
    let tables = args.iter().any(|a| a == "--tables");
    let seed = parse_arg(&args, "--seed", 42u64);
    let count = parse_arg(&args, "--count", SyntheticParams::default().transactions);
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");

    let config = match flag_value(&args, "--config") {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    config.validate().context("Invalid analysis config")?;

    let (rows, dims, skipped) = if synthetic {
        log::info!("generating synthetic ledger: seed={seed} count={count}");
        let params = SyntheticParams {
            transactions: count,
            ..SyntheticParams::default()
        };
        let ledger = SyntheticLedger::generate(seed, &params);
        let dims = ledger.dimensions();
        (ledger.rows, dims, 0)
    } else {
        log::info!("loading ledger from {data_dir}");
        let loaded = load_ledger(Path::new(data_dir))?;
        (loaded.rows, loaded.dims, loaded.skipped_rows)
    };

    let mut outcome = AnalysisEngine::new(config).run_raw(&rows, &dims)?;
    outcome.malformed_records += skipped;
    for failure in &outcome.degraded {
        eprintln!("degraded: {} ({})", failure.detector, failure.reason);
    }
    if outcome.malformed_records > 0 {
        eprintln!("excluded {} malformed rows", outcome.malformed_records);
    }

    let json = if tables {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome.summary)?
    };
    println!("{json}");
    Ok(())
}

/// A ledger read from disk. Transaction rows that failed to decode
/// are skipped and counted, never fatal.
struct LoadedLedger {
    rows:         Vec<RawTransaction>,
    dims:         Dimensions,
    skipped_rows: usize,
}

fn load_ledger(dir: &Path) -> Result<LoadedLedger> {
    let (holders, _) = read_csv::<CardHolderRow>(&dir.join("card_holder.csv"))?;
    let (cards, _) = read_csv::<CreditCardRow>(&dir.join("credit_card.csv"))?;
    let (merchants, _) = read_csv::<MerchantRow>(&dir.join("merchant.csv"))?;
    let (categories, _) = read_csv::<MerchantCategoryRow>(&dir.join("merchant_category.csv"))?;
    let (rows, skipped_rows) = read_csv::<RawTransaction>(&dir.join("transaction.csv"))?;

    let dims = Dimensions::new(
        holders.into_iter().map(|r| CardHolder { id: r.id, name: r.name }).collect(),
        cards
            .into_iter()
            .map(|r| Card {
                card_id:       r.card,
                cardholder_id: r.id_card_holder,
            })
            .collect(),
        merchants
            .into_iter()
            .map(|r| Merchant {
                id:          r.id,
                name:        r.name,
                category_id: r.id_merchant_category,
            })
            .collect(),
        categories
            .into_iter()
            .map(|r| MerchantCategory { id: r.id, name: r.name })
            .collect(),
    );

    Ok(LoadedLedger {
        rows,
        dims,
        skipped_rows,
    })
}

/// Read every decodable row. A missing file or an I/O failure is fatal;
/// a row that does not decode is logged and counted.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for result in rdr.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) if e.is_io_error() => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
            Err(e) => {
                log::warn!("skipping row in {}: {e}", path.display());
                skipped += 1;
            }
        }
    }
    log::debug!("{}: {} rows, {skipped} skipped", path.display(), rows.len());
    Ok((rows, skipped))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_ledger(dir: &Path, transactions: &str) {
        fs::write(dir.join("card_holder.csv"), "id,name\n1,Robert Johnson\n").unwrap();
        fs::write(dir.join("credit_card.csv"), "card,id_card_holder\n4761049645711555811,1\n").unwrap();
        fs::write(dir.join("merchant.csv"), "id,name,id_merchant_category\n7,Corner Coffee,2\n").unwrap();
        fs::write(dir.join("merchant_category.csv"), "id,name\n2,coffee shop\n").unwrap();
        fs::write(dir.join("transaction.csv"), transactions).unwrap();
    }

    #[test]
    fn loads_and_joins_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_ledger(
            dir.path(),
            "id,date,amount,card,id_merchant\n1,2018-01-01 08:30:00,1.50,4761049645711555811,7\n",
        );

        let loaded = load_ledger(dir.path()).unwrap();
        assert_eq!(loaded.skipped_rows, 0);
        assert_eq!(loaded.rows.len(), 1);

        let (joined, malformed) = loaded.dims.join(&loaded.rows);
        assert!(malformed.is_empty());
        assert_eq!(joined[0].cardholder_name, "Robert Johnson");
        assert_eq!(joined[0].merchant_name, "Corner Coffee");
        assert_eq!(joined[0].merchant_category, "coffee shop");
    }

    #[test]
    fn undecodable_transaction_rows_are_skipped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        write_ledger(
            dir.path(),
            "id,date,amount,card,id_merchant\n\
             1,2018-01-01 08:30:00,1.50,4761049645711555811,7\n\
             2,2018-01-01 09:00:00,3.00,4761049645711555811,x\n\
             3,2018-01-01 09:30:00\n",
        );

        let loaded = load_ledger(dir.path()).unwrap();
        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.skipped_rows, 2);

        let mut outcome = AnalysisEngine::new(AnalysisConfig::default())
            .run_raw(&loaded.rows, &loaded.dims)
            .unwrap();
        outcome.malformed_records += loaded.skipped_rows;
        assert_eq!(outcome.summary.basic_statistics.total_transactions, 1);
        assert_eq!(outcome.malformed_records, 2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_ledger(dir.path()).is_err());
    }
}
