use crate::models::Listing;
use crate::ranking::RankedListing;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use uuid::Uuid;

/// Loads a listing export. Rows that cannot be decoded are logged and
/// skipped; numeric cells that do not parse load as `NaN` so they score 0.
pub fn read_listings(path: &Path) -> Result<Vec<Listing>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    file.lock_shared()?;
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(&file);
    let mut listings = Vec::new();
    for (row, result) in reader.deserialize::<CsvListing>().enumerate() {
        match result {
            Ok(csv_listing) => listings.push(csv_listing.into_listing()),
            Err(err) => {
                // header is line 1
                tracing::warn!(line = row + 2, error = %err, "skipping unreadable listing row");
            }
        }
    }
    file.unlock()?;
    tracing::debug!(path = %path.display(), count = listings.len(), "loaded listings");
    Ok(listings)
}

pub fn write_ranked(path: &Path, ranked: &[RankedListing<'_>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(&file);
    for (i, entry) in ranked.iter().enumerate() {
        writer.serialize(CsvRanked::new(i + 1, entry))?;
    }
    writer.flush()?;
    file.unlock()?;
    tracing::info!(path = %path.display(), rows = ranked.len(), "exported ranking");
    Ok(())
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct CsvListing {
    id: String,
    town: String,
    flat_type: String,
    block: String,
    street_name: String,
    storey_range: String,
    floor_area_sqm: String,
    flat_model: String,
    lease_commence_date: String,
    resale_price: String,
}

impl CsvListing {
    fn into_listing(self) -> Listing {
        let id = Uuid::parse_str(self.id.trim()).unwrap_or_else(|_| Uuid::new_v4());
        Listing {
            id,
            town: self.town,
            block: self.block,
            street_name: self.street_name,
            flat_type: self.flat_type,
            storey_range: self.storey_range,
            floor_area_sqm: parse_number(&self.floor_area_sqm),
            flat_model: self.flat_model,
            lease_commence_date: self.lease_commence_date.trim().parse().ok(),
            resale_price: parse_number(&self.resale_price),
        }
    }
}

fn parse_number(cell: &str) -> f64 {
    cell.trim().replace(',', "").parse().unwrap_or(f64::NAN)
}

#[derive(serde::Serialize)]
struct CsvRanked {
    rank: usize,
    score: u8,
    id: Uuid,
    town: String,
    block: String,
    street_name: String,
    flat_type: String,
    storey_range: String,
    floor_area_sqm: f64,
    flat_model: String,
    resale_price: f64,
}

impl CsvRanked {
    fn new(rank: usize, entry: &RankedListing<'_>) -> Self {
        let l = entry.listing;
        CsvRanked {
            rank,
            score: entry.score,
            id: l.id,
            town: l.town.clone(),
            block: l.block.clone(),
            street_name: l.street_name.clone(),
            flat_type: l.flat_type.clone(),
            storey_range: l.storey_range.clone(),
            floor_area_sqm: l.floor_area_sqm,
            flat_model: l.flat_model.clone(),
            resale_price: l.resale_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Preferences;
    use crate::ranking::{RankOptions, rank};
    use std::io::Write;

    const EXPORT: &str = "\
month,town,flat_type,block,street_name,storey_range,floor_area_sqm,flat_model,lease_commence_date,remaining_lease,resale_price
2024-01,ANG MO KIO,4 ROOM,221,ANG MO KIO AVE 1,04 TO 06,90,New Generation,1979,58 years 05 months,428000
2024-01,BEDOK,3 ROOM,538,BEDOK NORTH ST 3,01 TO 03,not-a-number,New Generation,1981,60 years 02 months,385000
";

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_export_layout_and_ignores_extra_columns() {
        let file = write_temp(EXPORT);
        let listings = read_listings(file.path()).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].town, "ANG MO KIO");
        assert_eq!(listings[0].floor_area_sqm, 90.0);
        assert_eq!(listings[0].lease_commence_date, Some(1979));
        assert_eq!(listings[0].resale_price, 428_000.0);
        assert!(listings[1].floor_area_sqm.is_nan());
    }

    #[test]
    fn keeps_supplied_ids() {
        let id = Uuid::new_v4();
        let csv = format!("id,flat_type,resale_price\n{id},5 ROOM,\"650,000\"\n");
        let file = write_temp(&csv);
        let listings = read_listings(file.path()).unwrap();
        assert_eq!(listings[0].id, id);
        assert_eq!(listings[0].resale_price, 650_000.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_listings(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn ranked_export_writes_one_row_per_listing() {
        let file = write_temp(EXPORT);
        let listings = read_listings(file.path()).unwrap();
        let prefs = Preferences {
            flat_type: "4 ROOM".into(),
            ..Default::default()
        };
        let ranked = rank(&listings, &prefs, RankOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports").join("ranked.csv");
        write_ranked(&out, &ranked).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("rank,score,id,"));
        assert_eq!(lines.count(), 2);
        assert!(text.contains(",100,"));
    }
}
