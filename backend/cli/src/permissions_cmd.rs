//! `activity24 permissions`

use activity24_core::{Localizer, PermissionCatalog};
use activity24_stats::{ActivityListener, LanguagePack};

pub fn run(lang: &LanguagePack) {
    let mut catalog = PermissionCatalog::new();
    ActivityListener::register_permissions(&mut catalog);

    println!("{:<16} {:<8} DESCRIPTION", "PERMISSION", "CATEGORY");
    for (key, entry) in catalog.iter() {
        println!("{:<16} {:<8} {}", key, entry.cat, lang.lang(&entry.lang, &[]));
    }
}
