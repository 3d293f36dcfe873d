//! Built-in tables used when the configuration does not replace them.

use phf::{phf_map, phf_set};

pub(crate) const DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "10minutemail.com",
    "20minutemail.com",
    "burnermail.io",
    "discard.email",
    "dispostable.com",
    "emailondeck.com",
    "fakeinbox.com",
    "getairmail.com",
    "getnada.com",
    "guerrillamail.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "guerrillamailblock.com",
    "mailcatch.com",
    "maildrop.cc",
    "mailinator.com",
    "mailnesia.com",
    "mintemail.com",
    "moakt.com",
    "mohmal.com",
    "mytemp.email",
    "sharklasers.com",
    "spambox.us",
    "spamgourmet.com",
    "temp-mail.org",
    "tempinbox.com",
    "tempmail.com",
    "tempr.email",
    "throwawaymail.com",
    "trashmail.com",
    "trbvm.com",
    "yopmail.com",
    "yopmail.fr",
};

pub(crate) const ROLE_PREFIXES: phf::Set<&'static str> = phf_set! {
    "abuse",
    "accounts",
    "admin",
    "administrator",
    "billing",
    "careers",
    "contact",
    "enquiries",
    "feedback",
    "hello",
    "help",
    "hostmaster",
    "hr",
    "info",
    "inquiries",
    "jobs",
    "legal",
    "marketing",
    "media",
    "newsletter",
    "no-reply",
    "noreply",
    "office",
    "postmaster",
    "press",
    "privacy",
    "root",
    "sales",
    "security",
    "support",
    "team",
    "webmaster",
};

// clé = faute de frappe, valeur = domaine corrigé (jamais une clé elle-même)
pub(crate) const TYPO_CORRECTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "gmial.com" => "gmail.com",
    "gmai.com" => "gmail.com",
    "gamil.com" => "gmail.com",
    "gmal.com" => "gmail.com",
    "gmaill.com" => "gmail.com",
    "gnail.com" => "gmail.com",
    "gmail.co" => "gmail.com",
    "gmail.con" => "gmail.com",
    "gmail.cm" => "gmail.com",
    "hotmial.com" => "hotmail.com",
    "hotmal.com" => "hotmail.com",
    "hotmai.com" => "hotmail.com",
    "hotnail.com" => "hotmail.com",
    "hotmail.co" => "hotmail.com",
    "hotmail.con" => "hotmail.com",
    "yahooo.com" => "yahoo.com",
    "yaho.com" => "yahoo.com",
    "yhoo.com" => "yahoo.com",
    "yahoo.con" => "yahoo.com",
    "outlok.com" => "outlook.com",
    "outloo.com" => "outlook.com",
    "outlook.con" => "outlook.com",
    "iclod.com" => "icloud.com",
    "icoud.com" => "icloud.com",
    "icloud.con" => "icloud.com",
    "aol.con" => "aol.com",
    "protonmial.com" => "protonmail.com",
};
