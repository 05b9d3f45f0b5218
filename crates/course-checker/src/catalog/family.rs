use serde::{Deserialize, Serialize};
use std::fmt;

const DEGREE_CLUSTERS: [&str; 20] = [
    "cluster_1",
    "cluster_2",
    "cluster_3",
    "cluster_4",
    "cluster_5",
    "cluster_6",
    "cluster_7",
    "cluster_8",
    "cluster_9",
    "cluster_10",
    "cluster_11",
    "cluster_12",
    "cluster_13",
    "cluster_14",
    "cluster_15",
    "cluster_16",
    "cluster_17",
    "cluster_18",
    "cluster_19",
    "cluster_20",
];

const DIPLOMA_CATEGORIES: [&str; 21] = [
    "Agricultural_Sciences_Related",
    "Animal_Health_Related",
    "Applied_Sciences",
    "Building_Construction_Related",
    "Business_Related",
    "Clothing_Fashion_Textile",
    "Computing_IT_Related",
    "Education_Related",
    "Engineering_Technology_Related",
    "Environmental_Sciences",
    "Food_Science_Related",
    "Graphics_MediaStudies_Related",
    "Health_Sciences_Related",
    "Hospitality_Hotel_Tourism_Related",
    "Library_Information_Science",
    "Music_Related",
    "Natural_Sciences_Related",
    "Nutrition_Dietetics",
    "Social_Sciences",
    "Tax_Custom_Administration",
    "Technical_Courses",
];

const CERTIFICATE_CATEGORIES: [&str; 21] = [
    "Agricultural_Sciences_Related",
    "Animal_Health_Related",
    "Applied_Sciences",
    "Building_Construction_Related",
    "Business_Related",
    "Clothing_Fashion_Textile",
    "Computing_IT_Related",
    "Engineering_Cert_Related",
    "Engineering_Technology_Related",
    "Environmental_Sciences",
    "Food_Science_Related",
    "Graphics_MediaStudies_MediaProduction",
    "HairDressing_Beauty_Therapy",
    "Health_Sciences_Related",
    "Hospitality_Hotel_Tourism_Related",
    "Library_Information_Science",
    "Natural_Sciences_Related",
    "Nutrition_Dietetics",
    "Social_Sciences",
    "Tax_Custom_Administration",
    "clothing",
];

const MEDICAL_TRAINING_CATEGORIES: [&str; 1] = ["kmtc"];

/// Programme family; each owns a fixed, disjoint category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProgrammeFamily {
    #[serde(rename = "degree")]
    Degree,
    #[serde(rename = "diploma")]
    Diploma,
    #[serde(rename = "cert", alias = "certificate")]
    Certificate,
    #[serde(rename = "kmtc", alias = "medical_training", alias = "medical-training")]
    MedicalTraining,
}

impl ProgrammeFamily {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Degree,
            Self::Diploma,
            Self::Certificate,
            Self::MedicalTraining,
        ]
    }

    pub const fn categories(self) -> &'static [&'static str] {
        match self {
            Self::Degree => &DEGREE_CLUSTERS,
            Self::Diploma => &DIPLOMA_CATEGORIES,
            Self::Certificate => &CERTIFICATE_CATEGORIES,
            Self::MedicalTraining => &MEDICAL_TRAINING_CATEGORIES,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Diploma => "diploma",
            Self::Certificate => "certificate",
            Self::MedicalTraining => "medical training",
        }
    }

    pub const fn uses_cut_off_points(self) -> bool {
        matches!(self, Self::Degree)
    }

    /// Category key for a 1-based degree cluster number.
    pub fn degree_cluster(cluster_number: u8) -> Option<&'static str> {
        let index = usize::from(cluster_number).checked_sub(1)?;
        DEGREE_CLUSTERS.get(index).copied()
    }

    /// Cluster number (`"3"`) encoded in a degree category key (`cluster_3`).
    pub fn cluster_number(category: &str) -> Option<&str> {
        category
            .strip_prefix("cluster_")
            .filter(|number| !number.is_empty())
    }
}

impl fmt::Display for ProgrammeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
