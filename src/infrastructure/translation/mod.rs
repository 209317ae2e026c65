mod google;

pub use google::GoogleTranslator;
