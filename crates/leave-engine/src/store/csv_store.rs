use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{debug, info};

use super::{BookingStore, FetchedBookings};
use crate::booking::{Booking, BookingRow};
use crate::error::{DataFormatError, StoreError};

/// CSV-file booking store.
///
/// The file has a `Name,Start Date,End Date,Year` header and one row per
/// booking, dates written as `dd/mm/yyyy`. A missing file is an empty history.
/// Appends take no file lock; run a single writer per file.
#[derive(Debug, Clone)]
pub struct CsvBookingStore {
    path: PathBuf,
}

impl CsvBookingStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> Result<bool, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl BookingStore for CsvBookingStore {
    fn fetch_all(&self) -> Result<FetchedBookings, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "booking file does not exist yet");
            return Ok(FetchedBookings::default());
        }

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(&self.path)?;

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<BookingRow>().enumerate() {
            let row = index + 1;
            match result {
                Ok(record) => rows.push((row, Ok(record))),
                // A failing disk is a store failure, not a bad row.
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => rows.push((
                    row,
                    Err(DataFormatError {
                        row,
                        message: e.to_string(),
                    }),
                )),
            }
        }

        let fetched = FetchedBookings::from_rows(rows);
        debug!(
            path = %self.path.display(),
            bookings = fetched.bookings.len(),
            issues = fetched.issues.len(),
            "read booking file"
        );
        Ok(fetched)
    }

    fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(booking.to_row())?;
        writer.flush()?;

        info!(
            path = %self.path.display(),
            person = %booking.person(),
            start = %booking.start_date(),
            end = %booking.end_date(),
            "appended booking"
        );
        Ok(())
    }
}
