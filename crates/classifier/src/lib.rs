//! Keyword-rule intent classification for chat input.
//!
//! Maps free text to exactly one `Intent`:
//! - Topic rules (research, solution, education) are checked first
//! - Within a topic, refinements are checked before the topic catch-all
//! - Generic rules (pricing, public, service, contact) come last
//! - Anything else is `Intent::Default`
//!
//! Rule order is significant. Keyword sets overlap on purpose (a price
//! question is `research_pricing` inside the research topic and `pricing`
//! outside of it), so the first matching rule wins.

use std::sync::LazyLock;

use chatbot_model::Intent;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Invalid keyword pattern for {intent}: {source}")]
    InvalidPattern {
        intent: Intent,
        #[source]
        source: regex::Error,
    },
}

/// Shared price vocabulary. "얼마나" (how long) is not a price word.
macro_rules! price_keywords {
    () => {
        "가격|비용|견적|요금|단가|얼마(?:[^나]|$)"
    };
}

const PRICE: &str = price_keywords!();

/// Declarative form of one topic: trigger keywords, ordered refinements and
/// the catch-all returned when no refinement matches.
struct TopicKeywords {
    name: &'static str,
    trigger: &'static str,
    refinements: &'static [(Intent, &'static str)],
    catch_all: Intent,
}

const TOPICS: &[TopicKeywords] = &[
    TopicKeywords {
        name: "research",
        trigger: "리서치|설문조사|설문|조사",
        refinements: &[
            (Intent::ResearchPricing, PRICE),
            (Intent::ResearchPublic, "공공|기관|관공서|지자체|정부|입찰|조달"),
            (Intent::ResearchProcess, "기간|걸리|소요|절차|과정|진행|프로세스|일정"),
            (Intent::ResearchSample, "표본|샘플|응답자|패널|몇 ?명|인원|규모"),
            (Intent::ResearchOutput, "결과|보고서|리포트|산출물|데이터 제공|원자료|raw ?data"),
            (Intent::ResearchStandalone, "단독|조사만|설문만|리서치만|별도|따로"),
        ],
        catch_all: Intent::ResearchGeneral,
    },
    TopicKeywords {
        name: "solution",
        trigger: "솔루션|와이즈온|wiseon|조사분석 솔루션|데이터인|datain",
        refinements: &[
            (Intent::SolutionFeatures, "기능|특징|장점|차별|무엇을 할|뭘 할"),
            (Intent::SolutionPublic, "공공|기관|관공서|지자체|정부|조달"),
            (
                Intent::SolutionPricing,
                concat!(price_keywords!(), "|구독|라이선스|license"),
            ),
            (
                Intent::SolutionData,
                "기존 ?데이터|보유 ?데이터|엑셀|excel|csv|spss|데이터 ?분석|업로드",
            ),
            (Intent::SolutionReport, "보고서|리포트|report|자동화|자동 ?생성"),
            (Intent::SolutionOnboarding, "도입|시작|신청|절차|사용법|사용 방법|계정|데모|demo"),
            (Intent::SolutionBundle, "함께|같이|패키지|묶음|번들|bundle|연계"),
        ],
        catch_all: Intent::SolutionFeatures,
    },
    TopicKeywords {
        name: "education",
        trigger: "교육|학습|강의|과정|내일배움|국비|교육프로그램|수강",
        refinements: &[
            (Intent::EducationCard, "내일배움|국비|카드|지원금|환급|hrd"),
            (
                Intent::EducationPricing,
                concat!(price_keywords!(), "|수강료|교육비"),
            ),
            (Intent::EducationBeginner, "초보|비전공|처음|입문|기초|노베이스"),
            (Intent::EducationFormat, "온라인|오프라인|대면|비대면|zoom|줌|장소|어디서"),
            (Intent::EducationDuration, "기간|몇 ?주|몇 ?개월|몇 ?시간|일정|주말|평일"),
            (Intent::EducationCertificate, "수료증|수료|자격증|인증서|증명서"),
        ],
        catch_all: Intent::Education,
    },
];

const FALLBACKS: &[(Intent, &str)] = &[
    (Intent::Pricing, PRICE),
    (Intent::Public, "공공|기관|관공서|지자체|정부|조달|나라장터"),
    (Intent::Service, "서비스|상품|제품|사업|무슨 일|어떤 일|하는 일|회사 소개"),
    (
        Intent::Contact,
        "연락|전화|이메일|메일|e-?mail|문의처|위치|주소|오시는 길|찾아가|상담|카카오",
    ),
];

/// Normalize text for matching.
///
/// Only case folding is applied; Hangul has no case and passes through.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

/// A keyword predicate bound to the intent it yields.
#[derive(Debug, Clone)]
pub struct Rule {
    pub intent: Intent,
    keywords: Regex,
}

impl Rule {
    pub fn new(intent: Intent, pattern: &str) -> Result<Self, ClassifierError> {
        let keywords = Regex::new(pattern)
            .map_err(|source| ClassifierError::InvalidPattern { intent, source })?;
        Ok(Self { intent, keywords })
    }

    /// The first keyword occurrence in already-normalized text.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.keywords.find(text).map(|m| m.as_str())
    }

    pub fn pattern(&self) -> &str {
        self.keywords.as_str()
    }
}

/// A topic gate with its ordered refinements.
#[derive(Debug, Clone)]
pub struct Topic {
    pub name: &'static str,
    trigger: Rule,
    refinements: Vec<Rule>,
}

impl Topic {
    pub fn catch_all(&self) -> Intent {
        self.trigger.intent
    }

    pub fn refinements(&self) -> &[Rule] {
        &self.refinements
    }
}

/// The outcome of classification with the evidence that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub intent: Intent,

    /// Topic whose trigger matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'static str>,

    /// Keyword that decided the intent (the trigger for a catch-all)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Ordered rule set. Immutable once built.
#[derive(Debug, Clone)]
pub struct Classifier {
    topics: Vec<Topic>,
    fallbacks: Vec<Rule>,
}

static BUILTIN: LazyLock<Classifier> =
    LazyLock::new(|| Classifier::new().expect("built-in keyword patterns are valid"));

impl Classifier {
    /// Compile the built-in rule tables.
    pub fn new() -> Result<Self, ClassifierError> {
        let topics: Vec<Topic> = TOPICS
            .iter()
            .map(|def| -> Result<Topic, ClassifierError> {
                Ok(Topic {
                    name: def.name,
                    trigger: Rule::new(def.catch_all, def.trigger)?,
                    refinements: def
                        .refinements
                        .iter()
                        .map(|(intent, pattern)| Rule::new(*intent, pattern))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<_, _>>()?;

        let fallbacks: Vec<Rule> = FALLBACKS
            .iter()
            .map(|(intent, pattern)| Rule::new(*intent, pattern))
            .collect::<Result<_, _>>()?;

        Ok(Self { topics, fallbacks })
    }

    /// The process-wide rule set, compiled on first use.
    pub fn builtin() -> &'static Classifier {
        &BUILTIN
    }

    /// Classify text into a single intent.
    pub fn classify(&self, text: &str) -> Intent {
        self.explain(text).intent
    }

    /// Classify text and report which topic and keyword decided it.
    pub fn explain(&self, text: &str) -> Classification {
        let normalized = normalize_text(text);

        for topic in &self.topics {
            let Some(trigger) = topic.trigger.find(&normalized) else {
                continue;
            };

            let decided = topic
                .refinements
                .iter()
                .find_map(|rule| rule.find(&normalized).map(|kw| (rule.intent, kw)))
                .unwrap_or((topic.catch_all(), trigger));

            tracing::debug!(topic = topic.name, intent = %decided.0, keyword = decided.1, "Classified");
            return Classification {
                intent: decided.0,
                topic: Some(topic.name),
                keyword: Some(decided.1.to_string()),
            };
        }

        for rule in &self.fallbacks {
            if let Some(keyword) = rule.find(&normalized) {
                tracing::debug!(intent = %rule.intent, keyword, "Classified");
                return Classification {
                    intent: rule.intent,
                    topic: None,
                    keyword: Some(keyword.to_string()),
                };
            }
        }

        tracing::debug!("No rule matched");
        Classification {
            intent: Intent::Default,
            topic: None,
            keyword: None,
        }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn fallbacks(&self) -> &[Rule] {
        &self.fallbacks
    }

    /// Every intent this rule set can produce, in evaluation order, without
    /// duplicates. Always ends with `Intent::Default`.
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents = Vec::new();
        let ordered = self
            .topics
            .iter()
            .flat_map(|t| t.refinements.iter().map(|r| r.intent).chain([t.catch_all()]))
            .chain(self.fallbacks.iter().map(|r| r.intent))
            .chain([Intent::Default]);

        for intent in ordered {
            if !intents.contains(&intent) {
                intents.push(intent);
            }
        }
        intents
    }
}

/// Classify with the built-in rule set.
pub fn classify(text: &str) -> Intent {
    Classifier::builtin().classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_patterns_compile() {
        assert!(Classifier::new().is_ok());
    }

    #[test]
    fn test_normalize_folds_latin_only() {
        assert_eq!(normalize_text("WiseOn 리서치 DataIn"), "wiseon 리서치 datain");
        assert_eq!(normalize_text("설문조사"), "설문조사");
    }

    #[test]
    fn test_topic_refinement_wins() {
        assert_eq!(classify("리서치 가격이 얼마인가요"), Intent::ResearchPricing);
        assert_eq!(classify("리서치 가격"), Intent::ResearchPricing);
        assert_eq!(classify("솔루션 가격"), Intent::SolutionPricing);
        assert_eq!(classify("교육 가격"), Intent::EducationPricing);
        assert_eq!(classify("교육 듣는데 얼마 들어요"), Intent::EducationPricing);
        assert_eq!(classify("솔루션 얼마면 쓸 수 있어요"), Intent::SolutionPricing);
        assert_eq!(classify("리서치 얼마쯤 해요"), Intent::ResearchPricing);
        assert_eq!(classify("와이즈온 얼마임"), Intent::SolutionPricing);
    }

    #[test]
    fn test_generic_fallbacks() {
        assert_eq!(classify("가격 문의"), Intent::Pricing);
        assert_eq!(classify("얼마 드나요"), Intent::Pricing);
        assert_eq!(classify("얼마"), Intent::Pricing);
        assert_eq!(classify("공공기관도 이용 가능한가요?"), Intent::Public);
        assert_eq!(classify("어떤 서비스를 제공하나요?"), Intent::Service);
        assert_eq!(classify("사무실 위치가 어디인가요"), Intent::Contact);
        assert_eq!(classify("전화번호 알려주세요"), Intent::Contact);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(classify("안녕하세요"), Intent::Default);
        assert_eq!(classify("ㅎㅎ"), Intent::Default);
        assert_eq!(classify("얼마나 걸려요"), Intent::Default);
        assert_eq!(classify(""), Intent::Default);
    }

    #[test]
    fn test_research_refinements() {
        assert_eq!(classify("공공기관 설문조사 가능한가요"), Intent::ResearchPublic);
        assert_eq!(classify("조사 기간은 얼마나 걸리나요"), Intent::ResearchProcess);
        assert_eq!(classify("설문 응답자 몇 명까지 가능한가요"), Intent::ResearchSample);
        assert_eq!(classify("설문조사 결과 보고서는 어떻게 받나요"), Intent::ResearchOutput);
        assert_eq!(classify("리서치만 따로 의뢰할 수 있나요"), Intent::ResearchStandalone);
        assert_eq!(classify("리서치 회사인가요"), Intent::ResearchGeneral);
    }

    #[test]
    fn test_solution_refinements() {
        assert_eq!(classify("WiseOn 기능이 궁금해요"), Intent::SolutionFeatures);
        assert_eq!(classify("공공기관에서 와이즈온 쓸 수 있나요?"), Intent::SolutionPublic);
        assert_eq!(classify("DATAIN 요금"), Intent::SolutionPricing);
        assert_eq!(classify("데이터인으로 엑셀 파일도 되나요"), Intent::SolutionData);
        assert_eq!(classify("와이즈온 보고서 자동 생성"), Intent::SolutionReport);
        assert_eq!(classify("솔루션 도입 절차"), Intent::SolutionOnboarding);
        assert_eq!(classify("솔루션이랑 패키지로 가능할까요"), Intent::SolutionBundle);
        assert_eq!(classify("솔루션 소개해주세요"), Intent::SolutionFeatures);
    }

    #[test]
    fn test_education_refinements() {
        assert_eq!(classify("내일배움카드로 수강 가능한가요"), Intent::EducationCard);
        assert_eq!(classify("강의 수강료가 얼마예요"), Intent::EducationPricing);
        assert_eq!(classify("비전공자도 강의 들을 수 있나요"), Intent::EducationBeginner);
        assert_eq!(classify("교육은 온라인으로 진행되나요"), Intent::EducationFormat);
        assert_eq!(classify("교육 기간은"), Intent::EducationDuration);
        assert_eq!(classify("강의 수료증 나오나요"), Intent::EducationCertificate);
        assert_eq!(classify("교육 프로그램 안내"), Intent::Education);
    }

    #[test]
    fn test_topic_order_is_research_first() {
        // "조사" is a research trigger, so it shadows the solution compound.
        assert_eq!(classify("조사분석 솔루션 소개"), Intent::ResearchGeneral);
        assert_eq!(classify("설문조사 솔루션 가격"), Intent::ResearchPricing);
        // Solution outranks education.
        assert_eq!(classify("와이즈온 교육"), Intent::SolutionFeatures);
    }

    #[test]
    fn test_explain_reports_evidence() {
        let result = Classifier::builtin().explain("리서치 견적 부탁드려요");
        assert_eq!(
            result,
            Classification {
                intent: Intent::ResearchPricing,
                topic: Some("research"),
                keyword: Some("견적".to_string()),
            }
        );

        let catch_all = Classifier::builtin().explain("설문 관련해서요");
        assert_eq!(catch_all.intent, Intent::ResearchGeneral);
        assert_eq!(catch_all.keyword.as_deref(), Some("설문"));

        let none = Classifier::builtin().explain("반갑습니다");
        assert_eq!(none.topic, None);
        assert_eq!(none.keyword, None);
    }

    #[test]
    fn test_intents_in_evaluation_order() {
        let intents = Classifier::builtin().intents();
        assert_eq!(intents.first(), Some(&Intent::ResearchPricing));
        assert_eq!(intents.last(), Some(&Intent::Default));
        assert!(intents.contains(&Intent::Education));
        assert!(intents.contains(&Intent::Contact));
        // solution_features appears once despite being rule and catch-all.
        let features = intents.iter().filter(|i| **i == Intent::SolutionFeatures).count();
        assert_eq!(features, 1);
        assert_eq!(intents.len(), Intent::ALL.len());
    }
}
