//! Report categories and the fixed category → department routing table
//!
//! The routing is a suggestion shown to reporters and admins. Assignment may
//! still target any department.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All departments, in display order
pub const DEPARTMENTS: [&str; 10] = [
    "Estates",
    "Student Affairs",
    "Campus Security",
    "Health Services",
    "Academic Affairs",
    "Registrar",
    "Finance",
    "ICT",
    "Facilities",
    "General",
];

/// Closed set of issue categories
///
/// Serialized as the human-readable label (e.g. `"Hostels & Accommodation"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Buildings & Classrooms")]
    BuildingsClassrooms,
    #[serde(rename = "Electrical & Lighting")]
    ElectricalLighting,
    #[serde(rename = "Water & Sanitation")]
    WaterSanitation,
    #[serde(rename = "Hostels & Accommodation")]
    HostelsAccommodation,
    #[serde(rename = "Furniture & Equipment")]
    FurnitureEquipment,
    #[serde(rename = "Security Incidents")]
    SecurityIncidents,
    #[serde(rename = "Fire & Emergency Hazards")]
    FireEmergencyHazards,
    #[serde(rename = "Health & Medical Services")]
    HealthMedicalServices,
    #[serde(rename = "Lectures & Timetabling")]
    LecturesTimetabling,
    #[serde(rename = "Examinations & Assessments")]
    ExaminationsAssessments,
    #[serde(rename = "Lecturers & Teaching Quality")]
    LecturersTeachingQuality,
    #[serde(rename = "Registration & Records")]
    RegistrationRecords,
    #[serde(rename = "Fees & Finance Issues")]
    FeesFinance,
    #[serde(rename = "Internet & Network Access")]
    InternetNetworkAccess,
    #[serde(rename = "Learning Management Systems (LMS)")]
    LearningManagementSystems,
    #[serde(rename = "Computer Labs & ICT Support")]
    ComputerLabsIctSupport,
    #[serde(rename = "Catering & Food Services")]
    CateringFoodServices,
    #[serde(rename = "Accessibility & Disability Support")]
    AccessibilityDisabilitySupport,
    #[serde(rename = "Transport & Parking")]
    TransportParking,
    #[serde(rename = "Environmental & Cleanliness Issues")]
    EnvironmentalCleanliness,
    #[serde(rename = "Other / General Concern")]
    OtherGeneral,
}

impl Category {
    /// Every category, in reporting-form order
    pub const ALL: [Category; 21] = [
        Category::BuildingsClassrooms,
        Category::ElectricalLighting,
        Category::WaterSanitation,
        Category::HostelsAccommodation,
        Category::FurnitureEquipment,
        Category::SecurityIncidents,
        Category::FireEmergencyHazards,
        Category::HealthMedicalServices,
        Category::LecturesTimetabling,
        Category::ExaminationsAssessments,
        Category::LecturersTeachingQuality,
        Category::RegistrationRecords,
        Category::FeesFinance,
        Category::InternetNetworkAccess,
        Category::LearningManagementSystems,
        Category::ComputerLabsIctSupport,
        Category::CateringFoodServices,
        Category::AccessibilityDisabilitySupport,
        Category::TransportParking,
        Category::EnvironmentalCleanliness,
        Category::OtherGeneral,
    ];

    /// Display label, identical to the serialized form
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::BuildingsClassrooms => "Buildings & Classrooms",
            Category::ElectricalLighting => "Electrical & Lighting",
            Category::WaterSanitation => "Water & Sanitation",
            Category::HostelsAccommodation => "Hostels & Accommodation",
            Category::FurnitureEquipment => "Furniture & Equipment",
            Category::SecurityIncidents => "Security Incidents",
            Category::FireEmergencyHazards => "Fire & Emergency Hazards",
            Category::HealthMedicalServices => "Health & Medical Services",
            Category::LecturesTimetabling => "Lectures & Timetabling",
            Category::ExaminationsAssessments => "Examinations & Assessments",
            Category::LecturersTeachingQuality => "Lecturers & Teaching Quality",
            Category::RegistrationRecords => "Registration & Records",
            Category::FeesFinance => "Fees & Finance Issues",
            Category::InternetNetworkAccess => "Internet & Network Access",
            Category::LearningManagementSystems => "Learning Management Systems (LMS)",
            Category::ComputerLabsIctSupport => "Computer Labs & ICT Support",
            Category::CateringFoodServices => "Catering & Food Services",
            Category::AccessibilityDisabilitySupport => "Accessibility & Disability Support",
            Category::TransportParking => "Transport & Parking",
            Category::EnvironmentalCleanliness => "Environmental & Cleanliness Issues",
            Category::OtherGeneral => "Other / General Concern",
        }
    }

    /// Department this category is routed to by default
    #[must_use]
    pub fn suggested_department(self) -> &'static str {
        match self {
            Category::BuildingsClassrooms
            | Category::ElectricalLighting
            | Category::WaterSanitation
            | Category::FurnitureEquipment => "Estates",
            Category::HostelsAccommodation
            | Category::CateringFoodServices
            | Category::AccessibilityDisabilitySupport => "Student Affairs",
            Category::SecurityIncidents | Category::FireEmergencyHazards => "Campus Security",
            Category::HealthMedicalServices => "Health Services",
            Category::LecturesTimetabling
            | Category::ExaminationsAssessments
            | Category::LecturersTeachingQuality => "Academic Affairs",
            Category::RegistrationRecords => "Registrar",
            Category::FeesFinance => "Finance",
            Category::InternetNetworkAccess
            | Category::LearningManagementSystems
            | Category::ComputerLabsIctSupport => "ICT",
            Category::TransportParking | Category::EnvironmentalCleanliness => "Facilities",
            Category::OtherGeneral => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}
