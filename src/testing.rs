//! Shared test fixtures: a seeded flat-file store plus a working sheet
//! generator, all rooted in one temp directory.

use std::io::Write;
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::{Config, StoreBackend};
use crate::sheet::SheetGenerator;
use crate::store::{contract, FlatFileStore};
use crate::AppState;

pub fn test_state(dir: &TempDir) -> AppState {
    let data_file = dir.path().join("qr_mapping.txt");
    let mut file = std::fs::File::create(&data_file).unwrap();
    writeln!(file, "title|location|use|category").unwrap();
    for r in contract::seed_records() {
        writeln!(file, "{}|{}|{}|{}", r.title, r.location, r.use_, r.category).unwrap();
    }

    let logo_path = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(60, 60, image::Rgba([200, 30, 30, 255]))
        .save(&logo_path)
        .unwrap();

    let config = Config {
        port: 0,
        store_backend: StoreBackend::FlatFile,
        data_file: data_file.to_str().unwrap().to_string(),
        database_url: dir.path().join("qrref.db").to_str().unwrap().to_string(),
        public_base_url: "http://localhost:8080".to_string(),
        logo_path: logo_path.to_str().unwrap().to_string(),
        font_path: None,
    };

    AppState {
        store: Arc::new(FlatFileStore::new(&data_file)),
        sheet: Arc::new(SheetGenerator::from_config(&config)),
        config,
    }
}
