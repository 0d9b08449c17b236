//! Registration sections

use crate::dealers::DealerRecord;

/// One of the three registration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Company details
    Company,

    /// Tax clearance, incorporation certificate and director IDs
    Documents,

    /// Installation history
    Installations,
}

impl Section {
    /// All sections, in display order.
    pub const ALL: [Section; 3] = [Section::Company, Section::Documents, Section::Installations];

    /// Panel title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Section::Company => "Company Details",
            Section::Documents => "Documents",
            Section::Installations => "Installations",
        }
    }
}

/// Completion of each section for one dealer snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealerSections {
    /// Registered company, trading name and registration number are all set
    pub company: bool,

    /// All three document fields are set
    pub documents: bool,

    /// An installation history is present
    pub installations: bool,
}

/// Derive section completion from `dealer`.
///
/// Nothing is cached: a field cleared on the server makes its section
/// incomplete again on the next call.
#[must_use]
pub fn derive_sections(dealer: &DealerRecord) -> DealerSections {
    DealerSections {
        company: dealer.registered_company.is_some()
            && dealer.trading_name.is_some()
            && dealer.company_reg_number.is_some(),
        documents: dealer.tax_clearance.is_some()
            && dealer.certificate_of_incorporation.is_some()
            && dealer.director_id_copies.is_some(),
        // Presence only; the count is not checked.
        installations: dealer.installations.is_some(),
    }
}

impl DealerSections {
    /// Check whether `section` is complete.
    #[must_use]
    pub fn is_complete(&self, section: Section) -> bool {
        match section {
            Section::Company => self.company,
            Section::Documents => self.documents,
            Section::Installations => self.installations,
        }
    }

    /// Number of complete sections.
    #[must_use]
    pub fn completed(&self) -> u8 {
        Section::ALL
            .iter()
            .map(|&section| u8::from(self.is_complete(section)))
            .sum()
    }

    /// Completed sections as a fraction of all sections.
    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        f64::from(self.completed()) / 3.0
    }

    /// Progress bar width, in whole percent.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        match self.completed() {
            0 => 0,
            1 => 33,
            2 => 67,
            _ => 100,
        }
    }

    /// Check whether every section is complete.
    #[must_use]
    pub fn all_complete(&self) -> bool {
        self.completed() == 3
    }
}

/// Which registration panels are expanded.
///
/// Panels are independent; the registration screen keeps one open at a time
/// with [`RegistrationPanels::open_only`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationPanels {
    company: bool,
    documents: bool,
    installations: bool,
}

impl RegistrationPanels {
    /// Check whether the panel for `section` is expanded.
    #[must_use]
    pub fn is_open(&self, section: Section) -> bool {
        match section {
            Section::Company => self.company,
            Section::Documents => self.documents,
            Section::Installations => self.installations,
        }
    }

    /// Flip the panel for `section`, leaving the others alone.
    pub fn toggle(&mut self, section: Section) {
        let slot = self.slot(section);

        *slot = !*slot;
    }

    /// Expand `section` and collapse the others.
    pub fn open_only(&mut self, section: Section) {
        *self = Self::default();
        *self.slot(section) = true;
    }

    fn slot(&mut self, section: Section) -> &mut bool {
        match section {
            Section::Company => &mut self.company,
            Section::Documents => &mut self.documents,
            Section::Installations => &mut self.installations,
        }
    }
}
