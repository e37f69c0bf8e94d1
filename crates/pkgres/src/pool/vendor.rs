/// Groups of vendors considered interchangeable.
///
/// Each class is a list of lowercase vendor prefixes. A vendor belongs to every
/// class with a prefix it starts with; a vendor in no class has an empty mask.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorClasses {
    classes: Vec<Vec<String>>,
}

impl VendorClasses {
    pub fn new(classes: &[Vec<String>]) -> Self {
        Self {
            classes: classes
                .iter()
                .take(64)
                .map(|class| class.iter().map(|v| v.to_lowercase()).collect())
                .collect(),
        }
    }

    /// Bitmask of the classes `vendor` belongs to.
    pub fn mask(&self, vendor: &str) -> u64 {
        let vendor = vendor.to_lowercase();
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.iter().any(|prefix| vendor.starts_with(prefix.as_str())))
            .fold(0, |mask, (bit, _)| mask | (1u64 << bit))
    }

    /// Whether replacing a `from` vendor with `to` crosses vendor classes.
    pub fn is_vendor_change(&self, from: &str, to: &str) -> bool {
        if from.eq_ignore_ascii_case(to) {
            return false;
        }
        let from_mask = self.mask(from);
        from_mask != 0 && (from_mask & self.mask(to)) == 0
    }
}
