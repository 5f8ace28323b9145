//! File-type registration, standing in for the host's translator registry.
//!
//! The host registers a translator once at plugin load and deregisters it
//! at unload; both report failure through the usual error type.

use crate::errors::Result;
use crate::lep;

pub struct TranslatorDesc {
    pub name: &'static str,
    /// Preferred extension for save dialogs, without the period.
    pub default_extension: &'static str,
    pub can_read: bool,
    pub can_write: bool,
    /// Content-sniffing query: is this buffer one of our files?
    pub identify: fn(&[u8]) -> bool,
}

/// The descriptor for the LEP format itself.
pub fn lep_translator() -> TranslatorDesc {
    TranslatorDesc {
        name: "Lep",
        default_extension: lep::DEFAULT_EXTENSION,
        can_read: true,
        can_write: true,
        identify: lep::is_lep,
    }
}

#[derive(Default)]
pub struct Registry {
    translators: Vec<TranslatorDesc>,
}

impl Registry {
    pub fn register(&mut self, desc: TranslatorDesc) -> Result<()> {
        if self.translators.iter().any(|t| t.name == desc.name) {
            bail!("translator {} is already registered", desc.name);
        }
        self.translators.push(desc);
        Ok(())
    }

    pub fn deregister(&mut self, name: &str) -> Result<()> {
        match self.translators.iter().position(|t| t.name == name) {
            Some(i) => {
                self.translators.remove(i);
                Ok(())
            }
            None => bail!("no translator named {} is registered", name),
        }
    }

    /// The first registered translator that recognizes `buffer`.
    pub fn identify(&self, buffer: &[u8]) -> Option<&TranslatorDesc> {
        self.translators.iter().find(|t| (t.identify)(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_deregister() {
        let mut registry = Registry::default();
        registry.register(lep_translator()).unwrap();
        assert!(registry.register(lep_translator()).is_err());
        registry.deregister("Lep").unwrap();
        assert!(registry.deregister("Lep").is_err());
    }

    #[test]
    fn identify_goes_through_the_gate() {
        let mut registry = Registry::default();
        registry.register(lep_translator()).unwrap();
        let t = registry.identify(b"HIERARCHY\nROOT Hips\n").unwrap();
        assert_eq!(t.name, "Lep");
        assert_eq!(t.default_extension, "bvh");
        assert!(registry.identify(b"not a lep file").is_none());
    }
}
