//! Hand-written question templates keyed by question type.
//!
//! Placeholders are `{keyword1}`, `{keyword2}` and `{keyword3}`. Rendering is
//! deterministic given (type, template index, keywords).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    What,
    How,
    Why,
    When,
    Where,
    Who,
    Can,
    Do,
    Which,
    Explain,
    Describe,
    Discuss,
}

impl QuestionType {
    pub const ALL: [QuestionType; 12] = [
        QuestionType::What,
        QuestionType::How,
        QuestionType::Why,
        QuestionType::When,
        QuestionType::Where,
        QuestionType::Who,
        QuestionType::Can,
        QuestionType::Do,
        QuestionType::Which,
        QuestionType::Explain,
        QuestionType::Describe,
        QuestionType::Discuss,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::What => "what",
            QuestionType::How => "how",
            QuestionType::Why => "why",
            QuestionType::When => "when",
            QuestionType::Where => "where",
            QuestionType::Who => "who",
            QuestionType::Can => "can",
            QuestionType::Do => "do",
            QuestionType::Which => "which",
            QuestionType::Explain => "explain",
            QuestionType::Describe => "describe",
            QuestionType::Discuss => "discuss",
        }
    }

    pub fn templates(self) -> &'static [&'static str] {
        match self {
            QuestionType::What => WHAT,
            QuestionType::How => HOW,
            QuestionType::Why => WHY,
            QuestionType::When => WHEN,
            QuestionType::Where => WHERE,
            QuestionType::Who => WHO,
            QuestionType::Can => CAN,
            QuestionType::Do => DO,
            QuestionType::Which => WHICH,
            QuestionType::Explain => EXPLAIN,
            QuestionType::Describe => DESCRIBE,
            QuestionType::Discuss => DISCUSS,
        }
    }

    /// Template at `index`, wrapping around the template list.
    pub fn template(self, index: usize) -> &'static str {
        let templates = self.templates();
        templates[index % templates.len()]
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("Unknown question type '{s}'"))
    }
}

/// Substitutes `{keywordN}` with the N-th keyword. Placeholders without a
/// matching keyword are left in place.
pub fn render(template: &str, keywords: &[String]) -> String {
    keywords
        .iter()
        .enumerate()
        .fold(template.to_string(), |acc, (i, keyword)| {
            acc.replacen(&format!("{{keyword{}}}", i + 1), keyword, 1)
        })
}

/// Number of keyword placeholders in a template.
pub fn placeholder_count(template: &str) -> usize {
    template.matches("{keyword").count()
}

/// True while any `{keywordN}` placeholder remains.
pub fn has_unresolved_placeholder(text: &str) -> bool {
    text.contains("{keyword")
}

const WHAT: &[&str] = &[
    "What is the relationship between {keyword1} and {keyword2}?",
    "What role does {keyword1} play in {keyword2}?",
    "What are the key aspects of {keyword1} in relation to {keyword2}?",
    "What impact does {keyword1} have on {keyword2}?",
    "What factors contribute to {keyword1} in {keyword2}?",
    "What challenges does {keyword1} face in {keyword2}?",
    "What is the significance of {keyword1} in modern {keyword2}?",
    "What trends are emerging in {keyword1} for {keyword2}?",
    "What methods are used to analyze {keyword1} in {keyword2}?",
    "What solutions exist to improve {keyword1} in {keyword2}?",
    "What historical events shaped {keyword1} in {keyword2}?",
    "What are the main advantages of using {keyword1} in {keyword2}?",
    "What are the potential risks of {keyword1} in {keyword2}?",
    "What innovations are driving {keyword1} in {keyword2}?",
    "What tools are essential for understanding {keyword1} in {keyword2}?",
    "What are the critical differences between {keyword1} and {keyword2}?",
    "What role do policies play in shaping {keyword1} for {keyword2}?",
    "What recent studies highlight the importance of {keyword1} in {keyword2}?",
    "What are the implications of {keyword1} for {keyword2} in the future?",
    "What questions remain unanswered about {keyword1} and {keyword2}?",
];

const HOW: &[&str] = &[
    "How does {keyword1} affect {keyword2}?",
    "How can {keyword1} be used to improve {keyword2}?",
    "How do {keyword1} and {keyword2} interact with {keyword3}?",
    "How is {keyword1} implemented in {keyword2}?",
    "How can {keyword1} be optimized for {keyword2}?",
    "How does the development of {keyword1} influence {keyword2}?",
    "How can technology enhance {keyword1} in {keyword2}?",
    "How does collaboration between {keyword1} and {keyword2} work?",
    "How are strategies for {keyword1} evolving in {keyword2}?",
    "How does understanding {keyword1} help in achieving {keyword2}?",
    "How do experts address challenges in {keyword1} for {keyword2}?",
    "How does {keyword1} impact sustainability in {keyword2}?",
    "How do cultural factors influence {keyword1} and {keyword2}?",
    "How can {keyword1} be scaled effectively in {keyword2}?",
    "How does funding affect progress in {keyword1} and {keyword2}?",
    "How do researchers approach the study of {keyword1} in {keyword2}?",
    "How do advancements in {keyword1} affect {keyword2} outcomes?",
    "How can data improve decision-making in {keyword1} and {keyword2}?",
    "How do education and training enhance {keyword1} in {keyword2}?",
    "How is the global market responding to {keyword1} in {keyword2}?",
];

const WHY: &[&str] = &[
    "Why is {keyword1} important for {keyword2}?",
    "Why does {keyword1} influence {keyword2}?",
    "Why are {keyword1} and {keyword2} related to {keyword3}?",
    "Why should {keyword1} be considered in {keyword2}?",
    "Why do {keyword1} and {keyword2} affect each other?",
    "Why has {keyword1} become a priority in {keyword2}?",
    "Why are innovations in {keyword1} critical for {keyword2}?",
    "Why do policymakers focus on {keyword1} in {keyword2}?",
    "Why is collaboration between {keyword1} and {keyword2} essential?",
    "Why does understanding {keyword1} matter for {keyword2}?",
    "Why are ethical concerns surrounding {keyword1} in {keyword2} rising?",
    "Why is funding for {keyword1} important in {keyword2} research?",
    "Why are certain challenges in {keyword1} more prominent in {keyword2}?",
    "Why is it difficult to achieve progress in {keyword1} for {keyword2}?",
    "Why is {keyword1} gaining attention in the context of {keyword2}?",
    "Why do experts prioritize {keyword1} in addressing {keyword2}?",
    "Why has {keyword1} been linked to success in {keyword2}?",
    "Why do critics question the role of {keyword1} in {keyword2}?",
    "Why is public opinion divided on {keyword1} in {keyword2}?",
    "Why does the future of {keyword1} depend on {keyword2}?",
];

const WHEN: &[&str] = &[
    "When did {keyword1} first become relevant to {keyword2}?",
    "When should {keyword1} be introduced in {keyword2} processes?",
    "When is {keyword1} considered effective for {keyword2}?",
    "When do challenges in {keyword1} typically arise in {keyword2}?",
    "When is the best time to implement {keyword1} in {keyword2}?",
    "When was the last major advancement in {keyword1} for {keyword2}?",
    "When did researchers first study {keyword1} in relation to {keyword2}?",
    "When does {keyword1} have the greatest impact on {keyword2}?",
    "When are stakeholders most involved in {keyword1} for {keyword2}?",
    "When do ethical concerns about {keyword1} in {keyword2} become critical?",
];

const WHERE: &[&str] = &[
    "Where is {keyword1} most effective in {keyword2}?",
    "Where can {keyword1} be implemented to improve {keyword2}?",
    "Where do the benefits of {keyword1} align with {keyword2}?",
    "Where has {keyword1} been successfully integrated into {keyword2}?",
    "Where should changes be made to enhance {keyword1} in {keyword2}?",
    "Where have challenges in {keyword1} been resolved for {keyword2}?",
    "Where does research suggest {keyword1} impacts {keyword2} most?",
    "Where can resources for {keyword1} in {keyword2} be found?",
    "Where is progress in {keyword1} lagging in {keyword2}?",
    "Where do opportunities for innovation in {keyword1} exist in {keyword2}?",
];

const WHO: &[&str] = &[
    "Who benefits the most from {keyword1} in {keyword2}?",
    "Who is responsible for advancing {keyword1} in {keyword2}?",
    "Who are the key stakeholders in {keyword1} for {keyword2}?",
    "Who contributes to the development of {keyword1} in {keyword2}?",
    "Who should be accountable for {keyword1} outcomes in {keyword2}?",
    "Who are the leaders driving progress in {keyword1} and {keyword2}?",
    "Who are the critics of {keyword1} in {keyword2}, and why?",
    "Who can provide the most insight into {keyword1} for {keyword2}?",
    "Who are the target audiences for {keyword1} in {keyword2}?",
    "Who stands to lose the most if {keyword1} fails in {keyword2}?",
];

const CAN: &[&str] = &[
    "Can {keyword1} be used to improve {keyword2}?",
    "Can {keyword1} and {keyword2} work together effectively?",
    "Can {keyword1} solve the challenges in {keyword2}?",
    "Can {keyword1} provide better results for {keyword2}?",
    "Can {keyword1} and {keyword2} impact {keyword3} positively?",
    "Can {keyword1} replace traditional methods in {keyword2}?",
    "Can innovations in {keyword1} enhance {keyword2}?",
    "Can {keyword1} reduce costs associated with {keyword2}?",
    "Can {keyword1} improve the sustainability of {keyword2}?",
    "Can {keyword1} address ethical concerns in {keyword2}?",
    "Can {keyword1} be implemented globally in {keyword2}?",
    "Can {keyword1} improve efficiency in {keyword2} operations?",
    "Can {keyword1} support the long-term growth of {keyword2}?",
    "Can {keyword1} be customized for {keyword2} needs?",
    "Can {keyword1} and {keyword2} create value for stakeholders?",
    "Can {keyword1} adapt to the changing needs of {keyword2}?",
    "Can {keyword1} revolutionize the field of {keyword2}?",
    "Can {keyword1} integrate with existing systems in {keyword2}?",
    "Can {keyword1} increase the adoption of {keyword2}?",
    "Can {keyword1} overcome barriers in {keyword2} implementation?",
];

const DO: &[&str] = &[
    "Do {keyword1} and {keyword2} share common goals?",
    "Do {keyword1} affect the success of {keyword2}?",
    "Do {keyword1} and {keyword2} influence {keyword3} outcomes?",
    "Do policies in {keyword1} align with {keyword2} requirements?",
    "Do stakeholders support {keyword1} in {keyword2} contexts?",
    "Do trends in {keyword1} indicate growth in {keyword2}?",
    "Do innovations in {keyword1} apply to {keyword2} challenges?",
    "Do cultural differences impact {keyword1} in {keyword2}?",
    "Do advancements in {keyword1} enhance {keyword2} capabilities?",
    "Do collaborations in {keyword1} improve {keyword2} outcomes?",
    "Do ethical considerations affect {keyword1} in {keyword2}?",
    "Do {keyword1} solutions meet {keyword2} expectations?",
    "Do experts agree on the role of {keyword1} in {keyword2}?",
    "Do {keyword1} practices align with {keyword2} sustainability?",
    "Do data insights from {keyword1} apply to {keyword2}?",
    "Do consumers prefer {keyword1} over alternatives in {keyword2}?",
    "Do {keyword1} regulations hinder {keyword2} innovations?",
    "Do cost reductions in {keyword1} benefit {keyword2} systems?",
    "Do researchers focus on {keyword1} for solving {keyword2}?",
    "Do leadership strategies in {keyword1} affect {keyword2}?",
];

const WHICH: &[&str] = &[
    "Which factors influence {keyword1} and {keyword2} outcomes?",
    "Which methods are most effective for {keyword1} in {keyword2}?",
    "Which challenges does {keyword1} face in {keyword2} settings?",
    "Which tools improve {keyword1} in relation to {keyword2}?",
    "Which stakeholders benefit from {keyword1} in {keyword2}?",
    "Which advancements in {keyword1} impact {keyword2}?",
    "Which strategies enhance {keyword1} implementation in {keyword2}?",
    "Which policies support {keyword1} growth in {keyword2}?",
    "Which innovations in {keyword1} apply to {keyword2}?",
    "Which ethical concerns arise in {keyword1} for {keyword2}?",
    "Which cultural factors affect {keyword1} adoption in {keyword2}?",
    "Which costs are reduced by {keyword1} in {keyword2}?",
    "Which metrics evaluate {keyword1} success in {keyword2}?",
    "Which {keyword1} practices optimize {keyword2} performance?",
    "Which collaborations improve {keyword1} outcomes in {keyword2}?",
    "Which technologies drive {keyword1} progress in {keyword2}?",
    "Which trends in {keyword1} align with {keyword2} demands?",
    "Which key players support {keyword1} in {keyword2} settings?",
    "Which global regions adopt {keyword1} for {keyword2} the most?",
    "Which aspects of {keyword1} influence {keyword2} decisions?",
];

const EXPLAIN: &[&str] = &[
    "Explain the role of {keyword1} in {keyword2}.",
    "Explain how {keyword1} and {keyword2} interact in {keyword3}.",
    "Explain why {keyword1} is critical for {keyword2}.",
    "Explain how {keyword1} influences {keyword2} outcomes.",
    "Explain the challenges in implementing {keyword1} for {keyword2}.",
    "Explain the relationship between {keyword1} and {keyword2}.",
    "Explain how advancements in {keyword1} impact {keyword2}.",
    "Explain the ethical concerns surrounding {keyword1} in {keyword2}.",
    "Explain how {keyword1} can address issues in {keyword2}.",
    "Explain the innovations driving {keyword1} in {keyword2}.",
];

const DESCRIBE: &[&str] = &[
    "Describe the significance of {keyword1} in {keyword2}.",
    "Describe how {keyword1} has evolved in {keyword2} contexts.",
    "Describe the tools used to implement {keyword1} in {keyword2}.",
    "Describe the collaboration between {keyword1} and {keyword2}.",
    "Describe the current trends in {keyword1} for {keyword2}.",
    "Describe the role of leadership in {keyword1} and {keyword2}.",
    "Describe the impact of funding on {keyword1} for {keyword2}.",
    "Describe the challenges {keyword1} faces in achieving {keyword2}.",
    "Describe how {keyword1} is optimized for {keyword2}.",
    "Describe the future prospects of {keyword1} in {keyword2}.",
];

const DISCUSS: &[&str] = &[
    "Discuss the implications of {keyword1} for {keyword2}.",
    "Discuss how {keyword1} and {keyword2} shape {keyword3}.",
    "Discuss the importance of {keyword1} in modern {keyword2}.",
    "Discuss the role of {keyword1} in achieving {keyword2} goals.",
    "Discuss the challenges associated with {keyword1} in {keyword2}.",
    "Discuss the strategies to improve {keyword1} in {keyword2}.",
    "Discuss the global impact of {keyword1} on {keyword2}.",
    "Discuss the policies affecting {keyword1} in {keyword2}.",
    "Discuss the key stakeholders involved in {keyword1} and {keyword2}.",
    "Discuss the future developments of {keyword1} in {keyword2}.",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_render_substitutes_in_order() {
        let out = render(
            "How do {keyword1} and {keyword2} interact with {keyword3}?",
            &kw(&["caches", "threads", "locks"]),
        );
        assert_eq!(out, "How do caches and threads interact with locks?");
    }

    #[test]
    fn test_render_leaves_missing_placeholders() {
        let out = render("Why are {keyword1} and {keyword2} related to {keyword3}?", &kw(&["a", "b"]));
        assert!(has_unresolved_placeholder(&out));
    }

    #[test]
    fn test_extra_keywords_are_ignored() {
        let out = render("Why is {keyword1} important for {keyword2}?", &kw(&["a", "b", "c"]));
        assert_eq!(out, "Why is a important for b?");
        assert!(!has_unresolved_placeholder(&out));
    }

    #[test]
    fn test_render_is_injective_for_distinct_keyword_sets() {
        // Every prefix of these sets differs, so every template must tell them apart
        let sets = [
            kw(&["memory", "paging", "tlb"]),
            kw(&["paging", "memory", "tlb"]),
            kw(&["memory", "cache", "tlb"]),
            kw(&["disk", "paging", "swap"]),
        ];
        for qt in QuestionType::ALL {
            for template in qt.templates() {
                let rendered: std::collections::HashSet<String> =
                    sets.iter().map(|set| render(template, set)).collect();
                assert_eq!(rendered.len(), sets.len(), "collision in {template}");
            }
        }
    }

    #[test]
    fn test_template_index_wraps() {
        let len = QuestionType::Why.templates().len();
        assert_eq!(QuestionType::Why.template(0), QuestionType::Why.template(len));
    }

    #[test]
    fn test_every_template_has_placeholders() {
        for qt in QuestionType::ALL {
            assert!(!qt.templates().is_empty());
            for template in qt.templates() {
                assert!(placeholder_count(template) >= 2, "{template}");
                assert!(placeholder_count(template) <= 3, "{template}");
            }
        }
    }

    #[test]
    fn test_template_pool_sizes() {
        use QuestionType::*;
        for qt in [What, How, Why, Can, Do, Which] {
            assert_eq!(qt.templates().len(), 20, "{qt}");
        }
        for qt in [When, Where, Who, Explain, Describe, Discuss] {
            assert_eq!(qt.templates().len(), 10, "{qt}");
        }
        assert!(What.templates().iter().all(|t| placeholder_count(t) == 2));
    }

    #[test]
    fn test_question_type_parsing() {
        assert_eq!("WHY".parse::<QuestionType>(), Ok(QuestionType::Why));
        assert_eq!(" discuss ".parse::<QuestionType>(), Ok(QuestionType::Discuss));
        assert!("whence".parse::<QuestionType>().is_err());
        assert_eq!(QuestionType::Can.to_string(), "can");
    }
}
