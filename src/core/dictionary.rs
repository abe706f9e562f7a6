//! Dictionary Manager: static dan dynamic string table
//!
//! - Static: disuplai caller, immutable, boleh di-share antar thread
//! - Dynamic: ring buffer 128 slot, dipelajari selama satu sesi encode/decode
//!
//! Encoder dan decoder HARUS melihat string dalam urutan yang sama.
//! Index bersifat posisional, jadi divergensi tidak terdeteksi saat decode.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::protocol::format::{is_dynamic_eligible, DYNAMIC_DICTIONARY_SLOTS, MAX_STATIC_DICTIONARY};

/// Static dictionary: daftar string terurut, index == posisi
///
/// Immutable setelah dibuat; aman di-share read-only (mis. lewat `Arc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDictionary {
    entries: Vec<String>,
    positions: HashMap<String, u16>,
}

impl StaticDictionary {
    /// Membuat static dictionary dari daftar string
    ///
    /// Gagal jika jumlah entry melebihi 2048. Untuk entry duplikat,
    /// encoder memakai posisi pertama.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.len() > MAX_STATIC_DICTIONARY {
            return Err(Error::StaticDictionaryTooLarge {
                len: entries.len(),
                max: MAX_STATIC_DICTIONARY,
            });
        }

        let mut positions = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            // len <= 2048 sudah dicek, cast aman
            positions.entry(entry.clone()).or_insert(i as u16);
        }

        Ok(Self { entries, positions })
    }

    /// Index dari string, jika ada
    #[inline(always)]
    pub fn position(&self, s: &str) -> Option<u16> {
        self.positions.get(s).copied()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    #[inline(always)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ring buffer 128 slot untuk string yang baru dilihat
///
/// String ke-N yang eligible masuk slot (N-1) mod 128.
#[derive(Debug, Clone)]
pub struct DynamicDictionary {
    slots: Box<[Option<String>]>,
    inserted: usize,
    // Mask untuk modulo cepat (jumlah slot power of 2)
    mask: usize,
}

impl Default for DynamicDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicDictionary {
    pub fn new() -> Self {
        Self {
            slots: vec![None; DYNAMIC_DICTIONARY_SLOTS].into_boxed_slice(),
            inserted: 0,
            mask: DYNAMIC_DICTIONARY_SLOTS - 1,
        }
    }

    /// Slot yang akan dipakai insert berikutnya
    #[inline(always)]
    pub fn next_slot(&self) -> u8 {
        (self.inserted & self.mask) as u8
    }

    /// Tulis string ke slot berikutnya, return slot yang dipakai
    ///
    /// Caller bertanggung jawab mengecek eligibility.
    #[inline(always)]
    pub fn push(&mut self, s: &str) -> u8 {
        let slot = self.next_slot();
        self.slots[slot as usize] = Some(s.to_owned());
        self.inserted = self.inserted.wrapping_add(1);
        log::trace!("dynamic dictionary: slot {} <- {:?}", slot, s);
        slot
    }

    /// Insert hanya jika string eligible, return slot yang dipakai
    #[inline(always)]
    pub fn observe(&mut self, s: &str) -> Option<u8> {
        if is_dynamic_eligible(s) {
            Some(self.push(s))
        } else {
            None
        }
    }

    /// Lookup langsung by slot; `None` jika slot belum pernah diisi
    #[inline(always)]
    pub fn get(&self, slot: u8) -> Option<&str> {
        self.slots
            .get(slot as usize)
            .and_then(|s| s.as_deref())
    }

    /// Total insert sejak awal sesi
    #[inline(always)]
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        DYNAMIC_DICTIONARY_SLOTS
    }
}

/// Dynamic dictionary sisi encoder: ring buffer + reverse map string -> slot
///
/// Reverse map tidak pernah menunjuk slot yang akan ditimpa insert
/// berikutnya, supaya encoder tidak mengklaim hit untuk isi basi.
#[derive(Debug, Clone, Default)]
pub struct DynamicIndex {
    dictionary: DynamicDictionary,
    positions: HashMap<String, u8>,
}

impl DynamicIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot untuk string yang masih valid di dictionary
    #[inline(always)]
    pub fn lookup(&self, s: &str) -> Option<u8> {
        self.positions.get(s).copied()
    }

    /// Insert string eligible dan update reverse map
    pub fn observe(&mut self, s: &str) -> Option<u8> {
        let slot = self.dictionary.observe(s)?;
        self.positions.insert(s.to_owned(), slot);

        // Slot berikutnya akan ditimpa: lepas mapping-nya sekarang
        let next = self.dictionary.next_slot();
        if let Some(stale) = self.dictionary.get(next) {
            if self.positions.get(stale) == Some(&next) {
                self.positions.remove(stale);
            }
        }
        Some(slot)
    }

    /// Jumlah string yang saat ini bisa di-hit
    #[inline(always)]
    pub fn live_entries(&self) -> usize {
        self.positions.len()
    }

    pub fn dictionary(&self) -> &DynamicDictionary {
        &self.dictionary
    }
}
