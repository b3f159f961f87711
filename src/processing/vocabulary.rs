//! Skill, degree and institution vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Language,
    Framework,
    Database,
    Cloud,
    DevOps,
    DataScience,
    Mobile,
    Testing,
    Tool,
    Soft,
    Custom,
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SkillCategory::Language => "Languages",
            SkillCategory::Framework => "Frameworks",
            SkillCategory::Database => "Databases",
            SkillCategory::Cloud => "Cloud",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::DataScience => "Data Science",
            SkillCategory::Mobile => "Mobile",
            SkillCategory::Testing => "Testing",
            SkillCategory::Tool => "Tools",
            SkillCategory::Soft => "Soft Skills",
            SkillCategory::Custom => "Other",
        };
        write!(f, "{}", label)
    }
}

/// How a vocabulary term is located in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Case-insensitive substring, may sit inside a longer word
    Partial,
    /// Must be a complete token
    WholeWord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Canonical display name reported in profiles
    pub name: String,
    pub category: SkillCategory,
    pub aliases: Vec<String>,
}

impl SkillEntry {
    pub fn new(name: &str, category: SkillCategory, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            category,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Canonical name followed by aliases
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }
}

/// Terms of three or more characters that still occur inside everyday words.
const WHOLE_WORD_TERMS: &[&str] = &[
    "rust", "scala", "swift", "lua", "julia", "java", "aws", "ios", "git", "helm", "vault",
    "spark", "excel", "agile", "sketch", "jest", "express", "spring", "rails", "ror", "unity",
    "gin", "dart", "perl", "vue", "mongo", "react", "redis", "angular", "oracle", "flask", "sass",
    "bash", "flutter", "expo",
];

/// Whether a term is matched as a substring or only as a complete token
pub fn match_mode(term: &str) -> MatchMode {
    let lower = term.to_lowercase();
    if lower.chars().count() < 3 || WHOLE_WORD_TERMS.contains(&lower.as_str()) {
        MatchMode::WholeWord
    } else {
        MatchMode::Partial
    }
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: Vec<SkillEntry>,
    degree_keywords: Vec<String>,
    institution_keywords: Vec<String>,
    institution_names: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            skills: default_skills(),
            degree_keywords: DEGREE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            institution_keywords: INSTITUTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            institution_names: INSTITUTION_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Append user supplied skills. Names already known (by name or alias) are ignored.
    pub fn with_custom_skills<S: AsRef<str>>(mut self, custom: &[S]) -> Self {
        for skill in custom {
            let skill = skill.as_ref().trim();
            if skill.is_empty() || self.lookup(skill).is_some() {
                continue;
            }
            self.skills.push(SkillEntry::new(skill, SkillCategory::Custom, &[]));
        }
        self
    }

    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn degree_keywords(&self) -> &[String] {
        &self.degree_keywords
    }

    pub fn institution_keywords(&self) -> &[String] {
        &self.institution_keywords
    }

    pub fn institution_names(&self) -> &[String] {
        &self.institution_names
    }

    /// Find the entry whose name or alias equals `term`, ignoring case
    pub fn lookup(&self, term: &str) -> Option<&SkillEntry> {
        self.skills
            .iter()
            .find(|entry| entry.terms().any(|t| t.eq_ignore_ascii_case(term)))
    }

    pub fn category_of(&self, skill: &str) -> Option<SkillCategory> {
        self.lookup(skill).map(|entry| entry.category)
    }
}

const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "master", "doctorate", "doctor of", "diploma", "associate degree",
    "associate of", "phd", "ph.d", "mba", "bsc", "b.sc", "msc", "m.sc",
    "b.s.", "m.s.", "b.a.", "m.a.", "beng", "b.eng", "meng", "m.eng", "btech", "b.tech",
    "mtech", "m.tech", "specialist degree",
];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "university", "college", "institute", "school", "academy", "polytechnic", "conservatory",
];

const INSTITUTION_NAMES: &[&str] = &[
    "MIT", "Stanford", "Harvard", "Berkeley", "Caltech", "Oxford", "Cambridge", "Princeton",
    "Yale", "ETH Zurich", "EPFL", "HSE", "MSU", "ITMO",
];

fn default_skills() -> Vec<SkillEntry> {
    use SkillCategory::*;

    let table: &[(&str, SkillCategory, &[&str])] = &[
        // Languages
        ("Python", Language, &["python3"]),
        ("JavaScript", Language, &["js", "ecmascript", "es6"]),
        ("TypeScript", Language, &["ts"]),
        ("Java", Language, &[]),
        ("C++", Language, &["cpp"]),
        ("C#", Language, &["csharp", "c sharp"]),
        ("C", Language, &[]),
        ("Go", Language, &["golang"]),
        ("Rust", Language, &[]),
        ("Ruby", Language, &[]),
        ("PHP", Language, &[]),
        ("Swift", Language, &[]),
        ("Kotlin", Language, &[]),
        ("Scala", Language, &[]),
        ("R", Language, &[]),
        ("Perl", Language, &[]),
        ("Lua", Language, &[]),
        ("Dart", Language, &[]),
        ("Julia", Language, &[]),
        ("Haskell", Language, &[]),
        ("Elixir", Language, &[]),
        ("Clojure", Language, &[]),
        ("Objective-C", Language, &["objc"]),
        ("SQL", Language, &[]),
        ("Bash", Language, &["shell scripting"]),
        ("PowerShell", Language, &[]),
        ("HTML", Language, &["html5"]),
        ("CSS", Language, &["css3"]),
        ("Sass", Language, &["scss"]),
        // Frameworks
        ("React", Framework, &["react.js", "reactjs"]),
        ("Angular", Framework, &["angularjs"]),
        ("Vue.js", Framework, &["vue", "vuejs"]),
        ("Svelte", Framework, &[]),
        ("Next.js", Framework, &["nextjs"]),
        ("Node.js", Framework, &["nodejs"]),
        ("Express", Framework, &["express.js", "expressjs"]),
        ("Django", Framework, &[]),
        ("Flask", Framework, &[]),
        ("FastAPI", Framework, &[]),
        ("Spring Boot", Framework, &["spring", "springboot"]),
        ("Ruby on Rails", Framework, &["rails", "ror"]),
        ("Laravel", Framework, &[]),
        ("Symfony", Framework, &[]),
        ("ASP.NET", Framework, &["asp.net core"]),
        (".NET", Framework, &["dotnet", ".net core"]),
        ("jQuery", Framework, &[]),
        ("Redux", Framework, &[]),
        ("MobX", Framework, &[]),
        ("Hibernate", Framework, &[]),
        ("JPA", Framework, &[]),
        ("Bootstrap", Framework, &[]),
        ("Tailwind CSS", Framework, &["tailwind", "tailwindcss"]),
        ("GraphQL", Framework, &[]),
        ("gRPC", Framework, &[]),
        ("Qt", Framework, &[]),
        ("Gin", Framework, &[]),
        ("Celery", Framework, &[]),
        // Databases
        ("PostgreSQL", Database, &["postgres", "psql"]),
        ("MySQL", Database, &["mariadb"]),
        ("SQLite", Database, &[]),
        ("MongoDB", Database, &["mongo"]),
        ("Redis", Database, &[]),
        ("Elasticsearch", Database, &["elastic search"]),
        ("Oracle", Database, &[]),
        ("Microsoft SQL Server", Database, &["mssql", "sql server"]),
        ("Cassandra", Database, &[]),
        ("DynamoDB", Database, &[]),
        ("ClickHouse", Database, &[]),
        ("Firebase", Database, &["firestore"]),
        // Cloud
        ("AWS", Cloud, &["amazon web services"]),
        ("Azure", Cloud, &["microsoft azure"]),
        ("Google Cloud", Cloud, &["gcp", "google cloud platform"]),
        ("Heroku", Cloud, &[]),
        ("DigitalOcean", Cloud, &["digital ocean"]),
        ("Vercel", Cloud, &[]),
        ("Netlify", Cloud, &[]),
        // DevOps
        ("Docker", DevOps, &[]),
        ("Kubernetes", DevOps, &["k8s"]),
        ("Terraform", DevOps, &[]),
        ("Ansible", DevOps, &[]),
        ("Jenkins", DevOps, &[]),
        ("GitHub Actions", DevOps, &[]),
        ("GitLab CI", DevOps, &["gitlab-ci"]),
        ("CircleCI", DevOps, &[]),
        ("CI/CD", DevOps, &["continuous integration", "continuous delivery"]),
        ("Helm", DevOps, &[]),
        ("Nginx", DevOps, &[]),
        ("Prometheus", DevOps, &[]),
        ("Grafana", DevOps, &[]),
        ("Linux", DevOps, &[]),
        ("Kafka", DevOps, &["apache kafka"]),
        ("RabbitMQ", DevOps, &[]),
        ("Microservices", DevOps, &["microservice"]),
        ("Istio", DevOps, &[]),
        ("Argo CD", DevOps, &["argocd"]),
        // Data science
        ("Machine Learning", DataScience, &["ml"]),
        ("Deep Learning", DataScience, &[]),
        ("Natural Language Processing", DataScience, &["nlp"]),
        ("TensorFlow", DataScience, &[]),
        ("PyTorch", DataScience, &[]),
        ("scikit-learn", DataScience, &["sklearn", "scikit learn"]),
        ("Pandas", DataScience, &[]),
        ("NumPy", DataScience, &[]),
        ("Matplotlib", DataScience, &[]),
        ("Jupyter", DataScience, &[]),
        ("Spark", DataScience, &["pyspark", "apache spark"]),
        ("Hadoop", DataScience, &[]),
        ("Airflow", DataScience, &[]),
        ("Tableau", DataScience, &[]),
        ("Power BI", DataScience, &["powerbi"]),
        ("MLflow", DataScience, &[]),
        ("Kubeflow", DataScience, &[]),
        // Mobile
        ("React Native", Mobile, &[]),
        ("Flutter", Mobile, &[]),
        ("Android", Mobile, &[]),
        ("iOS", Mobile, &[]),
        ("SwiftUI", Mobile, &[]),
        ("Xamarin", Mobile, &[]),
        ("Unity", Mobile, &[]),
        ("Expo", Mobile, &[]),
        // Testing
        ("Jest", Testing, &[]),
        ("Pytest", Testing, &[]),
        ("Selenium", Testing, &[]),
        ("Cypress", Testing, &[]),
        ("JUnit", Testing, &[]),
        ("Playwright", Testing, &[]),
        ("Unit Testing", Testing, &["unit tests", "tdd"]),
        // Tools
        ("Git", Tool, &[]),
        ("GitHub", Tool, &[]),
        ("GitLab", Tool, &[]),
        ("Jira", Tool, &[]),
        ("Confluence", Tool, &[]),
        ("Figma", Tool, &[]),
        ("Sketch", Tool, &[]),
        ("Adobe Photoshop", Tool, &["photoshop"]),
        ("Excel", Tool, &["ms excel"]),
        ("Postman", Tool, &[]),
        ("Webpack", Tool, &[]),
        ("Maven", Tool, &[]),
        ("REST API", Tool, &["restful", "rest apis"]),
        ("Agile", Tool, &[]),
        ("Scrum", Tool, &[]),
        ("Kanban", Tool, &[]),
        // Soft skills
        ("Leadership", Soft, &["team lead"]),
        ("Communication", Soft, &[]),
        ("Teamwork", Soft, &["team player"]),
        ("Problem Solving", Soft, &["problem-solving"]),
        ("Time Management", Soft, &[]),
        ("Mentoring", Soft, &["mentorship"]),
        ("Project Management", Soft, &[]),
        ("Critical Thinking", Soft, &[]),
    ];

    table
        .iter()
        .map(|(name, category, aliases)| SkillEntry::new(name, *category, aliases))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_names_are_unique() {
        let vocabulary = Vocabulary::new();
        let mut seen = HashSet::new();
        for entry in vocabulary.skills() {
            assert!(seen.insert(entry.name.to_lowercase()), "duplicate {}", entry.name);
        }
    }

    #[test]
    fn test_aliases_resolve_to_canonical() {
        let vocabulary = Vocabulary::new();
        assert_eq!(vocabulary.lookup("k8s").unwrap().name, "Kubernetes");
        assert_eq!(vocabulary.lookup("Postgres").unwrap().name, "PostgreSQL");
        assert_eq!(vocabulary.lookup("golang").unwrap().name, "Go");
        assert_eq!(vocabulary.category_of("Django"), Some(SkillCategory::Framework));
    }

    #[test]
    fn test_match_modes() {
        assert_eq!(match_mode("Go"), MatchMode::WholeWord);
        assert_eq!(match_mode("C#"), MatchMode::WholeWord);
        assert_eq!(match_mode("Rust"), MatchMode::WholeWord);
        assert_eq!(match_mode("PostgreSQL"), MatchMode::Partial);
        assert_eq!(match_mode("SQL"), MatchMode::Partial);
        assert_eq!(match_mode("React"), MatchMode::WholeWord);
        assert_eq!(match_mode("react.js"), MatchMode::Partial);
    }

    #[test]
    fn test_custom_skills_are_appended_once() {
        let vocabulary = Vocabulary::new().with_custom_skills(&["Solidity", "python", "  ", "Solidity"]);
        let custom: Vec<&SkillEntry> = vocabulary
            .skills()
            .iter()
            .filter(|e| e.category == SkillCategory::Custom)
            .collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].name, "Solidity");
    }
}
