use std::{
    collections::HashMap,
    fs::{remove_file, File},
    io::{Seek, SeekFrom, Write},
    mem::ManuallyDrop,
    path::Path,
};

use log::trace;

use crate::frame::{OwnerId, VirtPage};

use super::SwapModule;

/// Size of one slot record: owner id plus page address.
const SLOT_SIZE: usize = 16;

/// File-backed swap journal.
///
/// Every `(owner, page)` pair gets one fixed-size slot; evicting the same
/// page again rewrites its slot. Only the slot assignment is journaled
/// here, copying the page contents belongs to the surrounding swap
/// subsystem.
pub struct FileSwapModule {
    file: ManuallyDrop<File>,

    /// path of file, saved for deleting the file later
    file_path: String,

    /// slot index per page that was persisted at least once
    slots: HashMap<(OwnerId, VirtPage), u64>,
}

impl FileSwapModule {
    pub fn new(filepath: String) -> std::io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .truncate(true)
            .create(true)
            .open(filepath.clone())?;

        Ok(Self {
            file: ManuallyDrop::new(file),
            file_path: filepath,
            slots: HashMap::new(),
        })
    }

    /// Number of slots handed out so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl SwapModule for FileSwapModule {
    fn persist(&mut self, owner: OwnerId, page: VirtPage) -> Result<(), ()> {
        let next_slot = self.slots.len() as u64;
        let slot = *self.slots.entry((owner, page)).or_insert(next_slot);

        let mut record = [0u8; SLOT_SIZE];
        record[..4].copy_from_slice(&owner.0.to_le_bytes());
        record[8..].copy_from_slice(&(page.0 as u64).to_le_bytes());

        self.file
            .seek(SeekFrom::Start(slot * SLOT_SIZE as u64))
            .map_err(|_| ())?;
        self.file.write_all(&record).map_err(|_| ())?;

        // the write-back must be durable before the frame is handed out
        // again
        self.file.sync_data().map_err(|_| ())?;

        trace!("persisted {:?} of {:?} to swap slot {}", page, owner, slot);
        Ok(())
    }
}

impl Drop for FileSwapModule {
    fn drop(&mut self) {
        // drop and close file before removing
        unsafe {
            ManuallyDrop::drop(&mut self.file);
        }

        if Path::new(self.file_path.as_str()).exists() {
            let _ = remove_file(self.file_path.as_str());
        }
    }
}
