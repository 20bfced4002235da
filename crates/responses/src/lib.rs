//! Canned chatbot answers keyed by intent.
//!
//! Every intent has a fixed, pre-written message and an optional call to
//! action pointing at an in-app route. Lookups never fail: an intent
//! without an entry resolves to the `default` answer.

use std::collections::HashMap;
use std::sync::LazyLock;

use chatbot_model::{Cta, Intent, QuickReplyOption, ResponseEntry};

/// The seed message every widget session starts with.
pub const GREETING: &str = "안녕하세요! 무엇을 도와드릴까요? 😊\n\
리서치 서비스, 조사분석 솔루션 와이즈온, 교육 프로그램에 대해 편하게 물어보세요.\n\
아래 자주 묻는 질문을 눌러 바로 확인하실 수도 있습니다.";

const CONTACT_PATH: &str = "/contact";
const RESEARCH_PATH: &str = "/business/research";
const SOLUTIONS_PATH: &str = "/business/solutions";
const EDUCATION_PATH: &str = "/business/education";
const BUSINESS_PATH: &str = "/business";

fn research(intent: Intent, message: &str) -> ResponseEntry {
    ResponseEntry::new(intent, message).with_cta(Cta::new("리서치 서비스 보기", RESEARCH_PATH))
}

fn solution(intent: Intent, message: &str) -> ResponseEntry {
    ResponseEntry::new(intent, message).with_cta(Cta::new("상세 정보 보기", SOLUTIONS_PATH))
}

fn education(intent: Intent, message: &str) -> ResponseEntry {
    ResponseEntry::new(intent, message).with_cta(Cta::new("교육 과정 보기", EDUCATION_PATH))
}

fn quote(intent: Intent, message: &str) -> ResponseEntry {
    ResponseEntry::new(intent, message).with_cta(Cta::new("견적 문의하기", CONTACT_PATH))
}

/// The built-in answer for an intent.
fn builtin_entry(intent: Intent) -> ResponseEntry {
    match intent {
        Intent::Pricing => quote(
            intent,
            "비용은 서비스 종류와 규모에 따라 달라집니다.\n\
             • 리서치: 표본 수와 조사 방식에 따라 견적 산정\n\
             • 와이즈온 솔루션: 기관 규모별 연간 라이선스\n\
             • 교육: 과정별 수강료 (국비지원 과정 별도)\n\
             정확한 견적은 문의를 남겨주시면 담당자가 안내해드립니다.",
        ),

        Intent::Public => ResponseEntry::new(
            intent,
            "네, 공공기관에서도 이용하실 수 있습니다.\n\
             조달 절차에 맞춘 계약과 공공기관 전용 보안 요건을 지원하며,\n\
             다수의 지자체 및 공공기관과 리서치·솔루션 사업을 수행해왔습니다.",
        )
        .with_cta(Cta::new("도입 상담 신청", CONTACT_PATH)),

        Intent::Service => ResponseEntry::new(
            intent,
            "저희는 세 가지 사업을 운영하고 있습니다.\n\
             1. 리서치 서비스: 설문 설계부터 조사, 분석 보고서까지\n\
             2. 조사분석 솔루션 와이즈온: 설문 데이터 분석·보고 자동화\n\
             3. 교육 프로그램: 데이터 분석 실무 교육\n\
             궁금하신 분야를 말씀해주세요!",
        )
        .with_cta(Cta::new("사업 분야 보기", BUSINESS_PATH)),

        Intent::Education => education(
            intent,
            "데이터 분석 실무 교육 프로그램을 운영하고 있습니다.\n\
             설문 설계, 통계 분석, 분석 보고서 작성까지 실습 위주로 진행되며\n\
             일부 과정은 국민내일배움카드로 수강하실 수 있습니다.",
        ),

        Intent::Contact => ResponseEntry::new(
            intent,
            "연락처 안내드립니다.\n\
             • 전화: 02-000-0000 (평일 09:00~18:00)\n\
             • 이메일: contact@example.com\n\
             문의 페이지에 내용을 남겨주시면 빠르게 답변드리겠습니다.",
        )
        .with_cta(Cta::new("문의하기", CONTACT_PATH)),

        Intent::Default => ResponseEntry::new(
            intent,
            "죄송합니다, 질문을 정확히 이해하지 못했어요. 😅\n\
             리서치, 솔루션, 교육, 비용, 연락처 등에 대해 물어보시거나\n\
             문의 페이지로 남겨주시면 담당자가 직접 답변드리겠습니다.",
        )
        .with_cta(Cta::new("문의하기", CONTACT_PATH)),

        Intent::ResearchGeneral => research(
            intent,
            "리서치 서비스는 조사 목적에 맞춰 설문 설계, 표본 설계, 실사,\n\
             데이터 분석, 결과 보고까지 전 과정을 수행합니다.\n\
             온라인·전화·대면 조사 등 다양한 방식이 가능합니다.",
        ),
        Intent::ResearchPricing => quote(
            intent,
            "리서치 비용은 표본 수, 문항 수, 조사 방식에 따라 산정됩니다.\n\
             조사 개요(대상, 규모, 일정)를 알려주시면\n\
             맞춤 견적서를 보내드리겠습니다.",
        ),
        Intent::ResearchPublic => research(
            intent,
            "공공기관 조사 수행 경험이 풍부합니다.\n\
             만족도 조사, 정책 수요 조사 등 공공 리서치를 수행해왔으며\n\
             입찰 및 수의계약 절차 모두 대응 가능합니다.",
        ),
        Intent::ResearchProcess => research(
            intent,
            "일반적인 리서치는 약 3~6주가 소요됩니다.\n\
             1. 요구사항 협의 및 설문 설계 (1주)\n\
             2. 실사 및 데이터 수집 (1~3주)\n\
             3. 분석 및 보고서 작성 (1~2주)\n\
             일정이 급하신 경우 별도로 협의해드립니다.",
        ),
        Intent::ResearchSample => research(
            intent,
            "표본 수는 조사 목적과 허용 오차에 맞춰 설계합니다.\n\
             일반적으로 수백 명에서 수천 명 규모까지 진행 가능하며\n\
             패널을 활용한 타깃 응답자 조사도 가능합니다.",
        ),
        Intent::ResearchOutput => research(
            intent,
            "조사 완료 후 다음 결과물을 제공해드립니다.\n\
             • 분석 결과 보고서\n\
             • 원자료(Raw Data) 및 코딩북\n\
             • 요청 시 결과 발표 자료\n\
             와이즈온 솔루션으로 결과를 직접 살펴보실 수도 있습니다.",
        ),
        Intent::ResearchStandalone => research(
            intent,
            "네, 리서치만 단독으로 의뢰하실 수 있습니다.\n\
             설문 설계만, 실사만, 분석만 등 필요한 단계만 선택해\n\
             진행하는 것도 가능합니다.",
        ),

        Intent::SolutionFeatures => solution(
            intent,
            "와이즈온은 조사분석 전 과정을 지원하는 솔루션입니다.\n\
             • 설문 데이터 업로드 및 자동 정제\n\
             • 교차분석·통계 분석 자동화\n\
             • 분석 보고서 자동 생성\n\
             전문 지식 없이도 쉽게 조사 데이터를 분석할 수 있습니다.",
        ),
        Intent::SolutionPublic => solution(
            intent,
            "네, 공공기관에서도 와이즈온을 사용하실 수 있습니다.\n\
             현재 1,400개 이상의 공공기관에서 활용 중이며\n\
             공공기관 보안 요건과 조달 절차에 맞춰 도입을 지원합니다.",
        ),
        Intent::SolutionPricing => quote(
            intent,
            "와이즈온은 기관 규모와 사용 인원에 따라 연간 라이선스로 제공됩니다.\n\
             무료 데모 후 도입을 결정하실 수 있으며\n\
             자세한 요금은 문의 주시면 안내해드립니다.",
        ),
        Intent::SolutionData => solution(
            intent,
            "기존에 보유하신 데이터도 분석할 수 있습니다.\n\
             엑셀, CSV, SPSS 파일을 업로드하면\n\
             자동으로 정제한 뒤 바로 분석을 시작할 수 있습니다.",
        ),
        Intent::SolutionReport => solution(
            intent,
            "와이즈온은 분석 결과를 바탕으로 보고서를 자동 생성합니다.\n\
             표와 차트가 포함된 보고서를 문서 파일로 내려받아\n\
             바로 활용하실 수 있습니다.",
        ),
        Intent::SolutionOnboarding => solution(
            intent,
            "도입 절차는 다음과 같습니다.\n\
             1. 도입 문의 및 요구사항 확인\n\
             2. 데모 시연 및 시범 사용\n\
             3. 계약 후 계정 발급 및 사용자 교육\n\
             보통 1~2주 안에 사용을 시작하실 수 있습니다.",
        ),
        Intent::SolutionBundle => solution(
            intent,
            "리서치 서비스와 와이즈온을 함께 이용하실 수 있습니다.\n\
             조사 수행 후 결과 데이터를 와이즈온에 연계해 드리며\n\
             패키지로 이용 시 별도 혜택을 안내해드립니다.",
        ),

        Intent::EducationCard => education(
            intent,
            "일부 과정은 국민내일배움카드로 수강 가능합니다.\n\
             카드 발급 여부와 자부담금은 개인별로 다를 수 있으니\n\
             HRD-Net에서 확인하시거나 문의 주세요.",
        ),
        Intent::EducationPricing => education(
            intent,
            "수강료는 과정별로 다릅니다.\n\
             국비지원 과정은 자부담금만 납부하시면 되며\n\
             기업·기관 단체 교육은 별도 견적으로 진행됩니다.",
        ),
        Intent::EducationBeginner => education(
            intent,
            "비전공자와 초보자도 충분히 수강하실 수 있습니다.\n\
             기초 통계부터 단계적으로 진행하며\n\
             실습 중심이라 처음 접하시는 분들도 쉽게 따라오실 수 있습니다.",
        ),
        Intent::EducationFormat => education(
            intent,
            "교육은 과정에 따라 온라인 실시간 강의와 오프라인 강의로 진행됩니다.\n\
             단체 교육은 기관 방문 교육도 가능합니다.",
        ),
        Intent::EducationDuration => education(
            intent,
            "교육 기간은 과정별로 다릅니다.\n\
             • 단기 과정: 1~2일\n\
             • 실무 과정: 4~8주 (주 2~3회)\n\
             세부 일정은 교육 과정 페이지에서 확인하실 수 있습니다.",
        ),
        Intent::EducationCertificate => education(
            intent,
            "출석 기준을 충족하시면 수료증이 발급됩니다.\n\
             국비지원 과정은 HRD-Net에 수료 이력이 등록됩니다.",
        ),
    }
}

/// Intent-keyed answers with a guaranteed fallback.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    entries: HashMap<Intent, ResponseEntry>,
    fallback: ResponseEntry,
}

static BUILTIN: LazyLock<ResponseTable> = LazyLock::new(|| {
    ResponseTable::new(
        Intent::ALL.into_iter().map(builtin_entry),
        builtin_entry(Intent::Default),
    )
});

impl ResponseTable {
    /// Build a table. Later entries for the same intent replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = ResponseEntry>, fallback: ResponseEntry) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.intent, e)).collect(),
            fallback,
        }
    }

    /// The built-in answers, built on first use.
    pub fn builtin() -> &'static ResponseTable {
        &BUILTIN
    }

    pub fn get(&self, intent: Intent) -> &ResponseEntry {
        self.entries.get(&intent).unwrap_or(&self.fallback)
    }

    /// Look up by raw tag; unknown tags get the fallback.
    pub fn get_tag(&self, tag: &str) -> &ResponseEntry {
        self.get(Intent::from(tag))
    }

    pub fn fallback(&self) -> &ResponseEntry {
        &self.fallback
    }

    /// Intents with no dedicated entry, in the given order.
    pub fn missing(&self, intents: impl IntoIterator<Item = Intent>) -> Vec<Intent> {
        intents
            .into_iter()
            .filter(|intent| !self.entries.contains_key(intent))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponseEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve an intent against the built-in table.
pub fn resolve(intent: Intent) -> &'static ResponseEntry {
    ResponseTable::builtin().get(intent)
}

/// Resolve a raw tag against the built-in table.
pub fn resolve_tag(tag: &str) -> &'static ResponseEntry {
    ResponseTable::builtin().get_tag(tag)
}

static QUICK_REPLIES: LazyLock<Vec<QuickReplyOption>> = LazyLock::new(|| {
    [
        ("service", "서비스 문의", Intent::Service),
        ("pricing", "비용 안내", Intent::Pricing),
        ("public", "공공기관 이용", Intent::Public),
        ("education", "교육 프로그램", Intent::Education),
        ("contact", "연락처", Intent::Contact),
    ]
    .into_iter()
    .map(|(id, label, intent)| QuickReplyOption {
        id: id.to_string(),
        label: label.to_string(),
        response: resolve(intent).clone(),
    })
    .collect()
});

/// The fixed menu shown before the first exchange.
pub fn quick_replies() -> &'static [QuickReplyOption] {
    &QUICK_REPLIES
}
