use serde::{Deserialize, Serialize};

/// Fees are whole currency units, charged per person per course.
pub type Fee = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    /// Six-week programmes
    Short,
    /// Six-month programmes
    Long,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Short => "short",
            CourseType::Long => "long",
        }
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: &'static str,
    pub name: &'static str,
    pub fee: Fee,
    pub duration_label: &'static str,
    pub course_type: CourseType,
    pub summary: &'static str,
    pub details: &'static str,
}

/// The fixed course catalog, in display order.
pub const CATALOG: &[Course] = &[
    Course {
        id: "childminding",
        name: "Child Minding",
        fee: 750,
        duration_label: "6 weeks",
        course_type: CourseType::Short,
        summary: "Basic child and baby care: safety, feeding, sleep routines and educational play.",
        details: "Covers newborn to toddler care, safety and hygiene, developmental milestones, \
                  creating learning activities and basic emergency response for caregivers.",
    },
    Course {
        id: "firstaid",
        name: "First Aid",
        fee: 1500,
        duration_label: "6 weeks",
        course_type: CourseType::Short,
        summary: "Basic first aid and life support: CPR, bleeding control, emergency scene management.",
        details: "Learn to evaluate emergencies, treat wounds, burns and fractures, manage breathing \
                  issues and perform CPR. Practical hands-on scenarios included.",
    },
    Course {
        id: "lifeskills",
        name: "Life Skills",
        fee: 1500,
        duration_label: "6 weeks",
        course_type: CourseType::Short,
        summary: "Practical life skills: basic literacy, numeracy, banking and labour rights.",
        details: "Focus on reading, writing and numeracy for daily tasks, opening a bank account, \
                  understanding basic labour law and personal budgeting.",
    },
    Course {
        id: "sewing",
        name: "Sewing",
        fee: 1500,
        duration_label: "6 months",
        course_type: CourseType::Long,
        summary: "Sewing, machine operation, stitching techniques and simple garment construction.",
        details: "Includes threading and maintaining a sewing machine, types of stitches, sewing \
                  buttons and zips, hemming, and simple pattern work for tailoring and alterations.",
    },
];

/// Look up a catalog entry by id (case-insensitive).
pub fn find_course(id: &str) -> Option<&'static Course> {
    let id = id.trim();
    CATALOG.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}
