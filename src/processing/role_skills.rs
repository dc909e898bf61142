//! Role to expected-skills knowledge base

use crate::error::{Result, ResumeInsightError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_ROLE_SKILLS: &[(&str, &[&str])] = &[
    ("Java Developer", &["Java", "Spring", "Spring Boot", "Hibernate", "JPA", "REST API", "Microservices", "SQL", "Git", "Maven"]),
    ("Testing", &["Manual Testing", "Test Cases", "SDLC", "STLC", "Bug Tracking", "JIRA", "Regression Testing"]),
    ("Automation Testing", &["Selenium", "Java", "Python", "TestNG", "JUnit", "Postman", "API Testing", "JIRA"]),
    ("DevOps Engineer", &["AWS", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Linux", "Ansible", "Terraform"]),
    ("Python Developer", &["Python", "Django", "Flask", "REST API", "SQL", "Git", "OOPs"]),
    ("Web Designing", &["HTML", "CSS", "JavaScript", "Bootstrap", "UI Design", "Responsive Design", "Figma"]),
    ("Web Developer", &["HTML", "CSS", "JavaScript", "React", "Node.js", "Express", "MongoDB", "Git"]),
    ("HR", &["Recruitment", "Onboarding", "Payroll", "HR Policies", "Employee Engagement", "Performance Management"]),
    ("Hadoop", &["Hadoop", "HDFS", "MapReduce", "Hive", "Pig", "Spark", "YARN"]),
    ("Sales", &["Sales Strategy", "Lead Generation", "CRM", "Negotiation", "Customer Handling", "Market Analysis"]),
    ("Data Science", &["Python", "Machine Learning", "Deep Learning", "Pandas", "NumPy", "Scikit-learn", "TensorFlow", "Tableau"]),
    ("Mechanical Engineer", &["AutoCAD", "SolidWorks", "Manufacturing", "Maintenance", "Thermodynamics", "Production Planning"]),
    ("ETL Developer", &["ETL", "Informatica", "Data Warehousing", "SQL", "Data Mapping", "Data Validation"]),
    ("Blockchain", &["Blockchain", "Ethereum", "Solidity", "Smart Contracts", "Web3", "Cryptography"]),
    ("Operations Manager", &["Operations Management", "Process Improvement", "Supply Chain", "Inventory Management", "Project Management"]),
    ("Arts", &["Creative Writing", "Content Creation", "Visual Arts", "Design", "Communication"]),
    ("Database", &["SQL", "MySQL", "PostgreSQL", "Oracle", "Database Design", "Query Optimization"]),
    ("Health and fitness", &["Fitness Training", "Nutrition", "Workout Planning", "Health Assessment", "Personal Training"]),
    ("PMO", &["Project Management", "MS Project", "Risk Management", "Documentation", "Stakeholder Management"]),
    ("Electrical Engineering", &["Power Systems", "PLC", "SCADA", "Electrical Machines", "Circuit Design", "Wiring"]),
    ("Business Analyst", &["Requirement Analysis", "SQL", "Power BI", "Excel", "Data Analysis", "Documentation"]),
    ("DotNet Developer", &[".NET", "C#", "ASP.NET", "MVC", "Entity Framework", "SQL Server"]),
    ("Network Security Engineer", &["Network Security", "Firewalls", "IDS/IPS", "Cyber Security", "VPN", "Ethical Hacking"]),
    ("Civil Engineer", &["AutoCAD", "Revit", "Construction Planning", "Estimation", "Site Engineering", "Building Design"]),
    ("SAP Developer", &["SAP ABAP", "SAP HANA", "SAP FICO", "SAP MM", "SAP SD"]),
    ("Advocate", &["Legal Research", "Drafting", "Court Proceedings", "Contracts", "Litigation", "Legal Compliance"]),
];

/// Immutable mapping from role name to its ordered list of expected skills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSkillTable {
    entries: Vec<RoleSkills>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSkills {
    pub role: String,
    pub skills: Vec<String>,
}

/// On-disk form of a replacement table
#[derive(Debug, Deserialize)]
struct RoleSkillFile {
    roles: Vec<RoleSkills>,
}

impl Default for RoleSkillTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleSkillTable {
    /// The 26-role table the bundled classifier was built against
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_ROLE_SKILLS.iter().map(|(role, skills)| RoleSkills {
            role: role.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }))
    }

    /// Build from entries in display order; a repeated role replaces the earlier skills
    pub fn from_entries<I: IntoIterator<Item = RoleSkills>>(entries: I) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for entry in entries {
            match table.index.get(&entry.role) {
                Some(&pos) => table.entries[pos] = entry,
                None => {
                    table.index.insert(entry.role.clone(), table.entries.len());
                    table.entries.push(entry);
                }
            }
        }

        table
    }

    /// Load a replacement table from a TOML file of `[[roles]]` entries
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: RoleSkillFile = toml::from_str(&content).map_err(|e| {
            ResumeInsightError::Configuration(format!(
                "Failed to parse role skill table '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_entries(file.roles))
    }

    /// Expected skills for `role`, empty when the role is unknown
    pub fn skills_for(&self, role: &str) -> &[String] {
        self.index
            .get(role)
            .map(|&pos| self.entries[pos].skills.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, role: &str) -> bool {
        self.index.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.role.as_str())
    }

    pub fn entries(&self) -> &[RoleSkills] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closest role name by Jaro-Winkler similarity, for "did you mean" hints
    pub fn closest_role(&self, query: &str) -> Option<(&str, f64)> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .map(|e| (e.role.as_str(), strsim::jaro_winkler(&query, &e.role.to_lowercase())))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
