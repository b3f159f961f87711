//! Technology stack analysis, role suggestions and skill gaps

use crate::processing::matcher::MatchResult;
use crate::processing::profile::{ExperienceLevel, ResumeProfile};
use crate::processing::skill_matcher::SkillMatcher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Stacks scoring below this are not reported
const MIN_STACK_SCORE: f64 = 0.3;
const CORE_SHARE: f64 = 0.8;
const BONUS_SHARE: f64 = 0.2;

const STACKS_FOR_ROLES: usize = 3;
const MAX_ROLES: usize = 5;
const MAX_STACK_GAPS: usize = 5;

/// Matches inspected when aggregating demanded skills
const MATCHES_FOR_GAPS: usize = 20;
const MAX_MARKET_GAPS: usize = 6;
const HIGH_QUALITY_SCORE: f64 = 75.0;
const MEDIUM_QUALITY_SCORE: f64 = 50.0;

/// A named technology stack: the skills that define it, the ones that
/// round it out, and the roles it leads to
#[derive(Debug, Clone, Copy)]
pub struct TechStack {
    pub name: &'static str,
    pub core: &'static [&'static str],
    pub bonus: &'static [&'static str],
    pub weight: f64,
    pub roles: &'static [&'static str],
}

pub const TECH_STACKS: &[TechStack] = &[
    TechStack {
        name: "Full Stack Web Development",
        core: &["React", "Node.js", "Express", "MongoDB", "PostgreSQL"],
        bonus: &["TypeScript", "Next.js", "GraphQL", "Redis", "AWS"],
        weight: 1.0,
        roles: &["Full Stack Developer", "Web Developer", "Software Engineer"],
    },
    TechStack {
        name: "Python Backend Development",
        core: &["Python", "Django", "Flask", "FastAPI", "PostgreSQL"],
        bonus: &["Redis", "Celery", "Docker", "AWS", "Kubernetes"],
        weight: 0.9,
        roles: &["Backend Developer", "Python Developer", "API Developer"],
    },
    TechStack {
        name: "Frontend Development",
        core: &["React", "TypeScript", "HTML", "CSS", "JavaScript"],
        bonus: &["Next.js", "Vue.js", "Angular", "Tailwind CSS", "Webpack"],
        weight: 0.8,
        roles: &["Frontend Developer", "React Developer", "UI Developer"],
    },
    TechStack {
        name: "Data Science & ML",
        core: &["Python", "Pandas", "NumPy", "TensorFlow", "PyTorch"],
        bonus: &["Jupyter", "scikit-learn", "Spark", "MLflow", "Kubeflow"],
        weight: 1.0,
        roles: &["Data Scientist", "ML Engineer", "Data Analyst"],
    },
    TechStack {
        name: "DevOps Engineering",
        core: &["Docker", "Kubernetes", "AWS", "Jenkins", "Terraform"],
        bonus: &["Ansible", "Prometheus", "Grafana", "Helm", "GitLab CI"],
        weight: 0.95,
        roles: &["DevOps Engineer", "Site Reliability Engineer", "Platform Engineer"],
    },
    TechStack {
        name: "Mobile Development",
        core: &["React Native", "Flutter", "Swift", "Kotlin"],
        bonus: &["Expo", "Firebase", "Redux", "MobX", "SwiftUI"],
        weight: 0.85,
        roles: &["Mobile Developer", "React Native Developer", "iOS/Android Developer"],
    },
    TechStack {
        name: "Java Enterprise",
        core: &["Java", "Spring Boot", "Maven", "PostgreSQL", "Docker"],
        bonus: &["JPA", "Hibernate", "Kafka", "Microservices", "JUnit"],
        weight: 0.8,
        roles: &["Java Developer", "Backend Developer", "Enterprise Developer"],
    },
    TechStack {
        name: "Cloud Architecture",
        core: &["AWS", "Docker", "Kubernetes", "Terraform", "Microservices"],
        bonus: &["Istio", "Prometheus", "Grafana", "Argo CD", "Helm"],
        weight: 1.0,
        roles: &["Cloud Architect", "Solutions Architect", "Cloud Engineer"],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackScore {
    pub name: String,
    /// Weighted share of the stack's skills the profile covers
    pub score: f64,
}

/// What a profile says about where its owner fits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInsights {
    pub tech_stacks: Vec<StackScore>,
    pub primary_stack: Option<String>,
    pub role_recommendations: Vec<String>,
    /// Skills missing for the primary stack, core skills first
    pub skill_gaps: Vec<String>,
}

/// Aggregate view over a set of job matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerSummary {
    pub total_matches: usize,
    pub high_quality_matches: usize,
    pub medium_quality_matches: usize,
    /// Skills the matched postings ask for most often that the profile lacks
    pub top_skill_gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

fn lowercase_set(skills: &BTreeSet<String>) -> HashSet<String> {
    skills.iter().map(|s| s.to_lowercase()).collect()
}

fn covered(list: &[&str], owned: &HashSet<String>) -> usize {
    list.iter().filter(|s| owned.contains(&s.to_lowercase())).count()
}

fn share(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

/// Stacks the skills cover well enough to mention, best first
pub fn analyze_tech_stacks(skills: &BTreeSet<String>) -> Vec<StackScore> {
    let owned = lowercase_set(skills);

    let mut scores: Vec<StackScore> = TECH_STACKS
        .iter()
        .map(|stack| {
            let core = share(covered(stack.core, &owned), stack.core.len());
            let bonus = share(covered(stack.bonus, &owned), stack.bonus.len());
            StackScore {
                name: stack.name.to_string(),
                score: (core * CORE_SHARE + bonus * BONUS_SHARE) * stack.weight,
            }
        })
        .filter(|s| s.score >= MIN_STACK_SCORE)
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

/// Roles for the strongest stacks, prefixed by seniority
pub fn recommend_roles(stacks: &[StackScore], level: ExperienceLevel) -> Vec<String> {
    let prefix = match level {
        ExperienceLevel::Senior => Some("Senior"),
        ExperienceLevel::Entry => Some("Junior"),
        ExperienceLevel::Mid | ExperienceLevel::Unknown => None,
    };

    let mut seen = HashSet::new();
    stacks
        .iter()
        .take(STACKS_FOR_ROLES)
        .filter_map(|score| TECH_STACKS.iter().find(|s| s.name == score.name))
        .flat_map(|stack| stack.roles.iter())
        .map(|role| match prefix {
            Some(prefix) if !role.starts_with(prefix) => format!("{} {}", prefix, role),
            _ => role.to_string(),
        })
        .filter(|role| seen.insert(role.clone()))
        .take(MAX_ROLES)
        .collect()
}

/// Skills of `stack_name` the profile does not have yet. Unknown stacks have no gaps.
pub fn identify_skill_gaps(skills: &BTreeSet<String>, stack_name: &str) -> Vec<String> {
    let Some(stack) = TECH_STACKS.iter().find(|s| s.name == stack_name) else {
        return Vec::new();
    };
    let owned = lowercase_set(skills);
    stack
        .core
        .iter()
        .chain(stack.bonus.iter())
        .filter(|skill| !owned.contains(&skill.to_lowercase()))
        .take(MAX_STACK_GAPS)
        .map(|skill| skill.to_string())
        .collect()
}

pub fn profile_insights(profile: &ResumeProfile) -> ProfileInsights {
    let tech_stacks = analyze_tech_stacks(&profile.skills);
    let primary_stack = tech_stacks.first().map(|s| s.name.clone());
    let role_recommendations = recommend_roles(&tech_stacks, profile.experience_level);
    let skill_gaps = primary_stack
        .as_deref()
        .map(|name| identify_skill_gaps(&profile.skills, name))
        .unwrap_or_default();

    ProfileInsights {
        tech_stacks,
        primary_stack,
        role_recommendations,
        skill_gaps,
    }
}

/// Count the vocabulary skills the best matches ask for that the profile
/// lacks, and turn the match spread into next steps
pub fn career_summary(
    profile: &ResumeProfile,
    matches: &[MatchResult],
    skill_matcher: &SkillMatcher,
) -> CareerSummary {
    if matches.is_empty() {
        return CareerSummary {
            recommendations: vec![
                "No suitable matches found; focus on fundamental skills".to_string(),
                "Build portfolio projects that show practical experience".to_string(),
            ],
            ..CareerSummary::default()
        };
    }

    let high = matches.iter().filter(|m| m.score >= HIGH_QUALITY_SCORE).count();
    let medium = matches
        .iter()
        .filter(|m| m.score >= MEDIUM_QUALITY_SCORE && m.score < HIGH_QUALITY_SCORE)
        .count();

    let owned = lowercase_set(&profile.skills);
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for result in matches.iter().take(MATCHES_FOR_GAPS) {
        for skill in skill_matcher.find_skills(&result.job.search_blob()) {
            if owned.contains(&skill.to_lowercase()) {
                continue;
            }
            let count = counts.entry(skill.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(skill);
            }
            *count += 1;
        }
    }
    // Stable sort keeps first-seen order among equal counts
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen.truncate(MAX_MARKET_GAPS);

    let mut recommendations = Vec::new();
    if high >= 3 {
        recommendations.push("Apply to your top matches first".to_string());
        recommendations.push("Tailor the résumé to each high-match posting".to_string());
    } else if medium >= 5 {
        recommendations.push("Close skill gaps to lift medium matches".to_string());
        recommendations.push("Apply to a few medium matches as stretch roles".to_string());
    }
    if let Some(gap) = first_seen.first() {
        recommendations.push(format!("Learn {}: the matched postings ask for it most", gap));
    }

    CareerSummary {
        total_matches: matches.len(),
        high_quality_matches: high,
        medium_quality_matches: medium,
        top_skill_gaps: first_seen,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::{JobMatcher, JobPosting};
    use crate::processing::vocabulary::Vocabulary;

    fn skills(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_python_backend_stack_ranks_first() {
        let stacks = analyze_tech_stacks(&skills(&["Python", "Django", "Flask", "PostgreSQL", "Redis"]));
        assert_eq!(stacks[0].name, "Python Backend Development");
        // core 4/5, bonus 1/5, weight 0.9
        assert!((stacks[0].score - 0.612).abs() < 1e-9);
        assert!(stacks.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert!(stacks.iter().all(|s| s.score >= MIN_STACK_SCORE));
    }

    #[test]
    fn test_no_stack_for_scattered_skills() {
        assert!(analyze_tech_stacks(&skills(&["Excel", "Jira"])).is_empty());
        assert_eq!(profile_insights(&ResumeProfile::default()), ProfileInsights::default());
    }

    #[test]
    fn test_roles_follow_seniority() {
        let stacks = analyze_tech_stacks(&skills(&["Docker", "Kubernetes", "AWS", "Jenkins", "Terraform"]));
        let senior = recommend_roles(&stacks, ExperienceLevel::Senior);
        assert_eq!(senior[0], "Senior DevOps Engineer");
        assert!(senior.len() <= MAX_ROLES);

        let junior = recommend_roles(&stacks, ExperienceLevel::Entry);
        assert!(junior.iter().all(|r| r.starts_with("Junior ")));

        let mid = recommend_roles(&stacks, ExperienceLevel::Mid);
        assert_eq!(mid[0], "DevOps Engineer");
    }

    #[test]
    fn test_skill_gaps_list_core_before_bonus() {
        let gaps = identify_skill_gaps(&skills(&["python", "Django"]), "Python Backend Development");
        assert_eq!(gaps, vec!["Flask", "FastAPI", "PostgreSQL", "Redis", "Celery"]);
        assert!(identify_skill_gaps(&skills(&["Python"]), "Cobol Mainframes").is_empty());
    }

    #[test]
    fn test_career_summary_counts_demanded_skills() {
        let profile = ResumeProfile::with_skills(["Python", "Django"]);
        let jobs = vec![
            JobPosting::new("Python Developer", "Python, Django, Docker and Kubernetes"),
            JobPosting::new("Backend Engineer", "Django services on Docker"),
            JobPosting::new("Data Engineer", "Python and Kafka"),
        ];
        let matches = JobMatcher::default().rank_jobs(&profile, &jobs);
        let matcher = SkillMatcher::new(Vocabulary::new()).unwrap();

        let summary = career_summary(&profile, &matches, &matcher);
        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.high_quality_matches, 1);
        assert_eq!(summary.medium_quality_matches, 2);
        assert_eq!(summary.top_skill_gaps[0], "Docker");
        assert!(summary.top_skill_gaps.contains(&"Kafka".to_string()));
        assert!(!summary.top_skill_gaps.contains(&"Python".to_string()));
        assert!(summary.recommendations.iter().any(|r| r.contains("Docker")));
    }

    #[test]
    fn test_career_summary_without_matches() {
        let matcher = SkillMatcher::new(Vocabulary::new()).unwrap();
        let summary = career_summary(&ResumeProfile::default(), &[], &matcher);
        assert_eq!(summary.total_matches, 0);
        assert!(summary.top_skill_gaps.is_empty());
        assert!(!summary.recommendations.is_empty());
    }
}
