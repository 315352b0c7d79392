use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "files/Incidencias_SAP_Commissions_20250127.xlsx";
pub const DEFAULT_SHEET: &str = "BD";
pub const DEFAULT_INCIDENT_TYPE: &str = "Acceso a SAP";
pub const DEFAULT_TOP_BRANCHES: usize = 10;

/// Everything the pipeline needs to know besides the user's category pick.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub source: PathBuf,
    pub sheet: String,
    pub incident_type: String,
    pub top_branches: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            sheet: DEFAULT_SHEET.to_string(),
            incident_type: DEFAULT_INCIDENT_TYPE.to_string(),
            top_branches: DEFAULT_TOP_BRANCHES,
        }
    }
}

impl DashboardSettings {
    pub fn title(&self) -> String {
        format!("Dynamic KPI Dashboard for '{}'", self.incident_type)
    }

    pub fn empty_message(&self) -> String {
        format!("No data available for '{}'.", self.incident_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_commissions_workbook() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.sheet, "BD");
        assert_eq!(settings.top_branches, 10);
        assert_eq!(settings.title(), "Dynamic KPI Dashboard for 'Acceso a SAP'");
        assert_eq!(
            settings.empty_message(),
            "No data available for 'Acceso a SAP'."
        );
    }
}
