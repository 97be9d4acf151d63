pub mod judge;
pub mod kana;
pub mod romaji;
pub mod settings;
pub mod stats;
pub mod unicode;
