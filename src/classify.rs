//! Category assignment by a priority-ordered keyword cascade.
//!
//! Each rule pairs a predicate over lowercased [`Signals`] with the category it
//! yields. Rules are evaluated top to bottom and the first hit wins; the final
//! fallback is [`Category::Framework`]. Source specializations only ever remap
//! that fallback.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    McpServer,
    AiAgent,
    Web3Tool,
    DefiTool,
    Infra,
    Framework,
    SaasTool,
    ApiService,
    DeveloperTool,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::McpServer,
        Category::AiAgent,
        Category::Web3Tool,
        Category::DefiTool,
        Category::Infra,
        Category::Framework,
        Category::SaasTool,
        Category::ApiService,
        Category::DeveloperTool,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::McpServer => "mcp-server",
            Category::AiAgent => "ai-agent",
            Category::Web3Tool => "web3-tool",
            Category::DefiTool => "defi-tool",
            Category::Infra => "infra",
            Category::Framework => "framework",
            Category::SaasTool => "saas-tool",
            Category::ApiService => "api-service",
            Category::DeveloperTool => "developer-tool",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Vocabulary ──

const AI_KEYWORDS: &[&str] = &[
    "agent",
    "llm",
    "gpt",
    "claude",
    "openai",
    "langchain",
    "artificial intelligence",
    "machine-learning",
    "generative-ai",
    "chatbot",
    "natural-language-processing",
    "automation",
];
const AI_TOPICS: &[&str] = &[
    "artificial-intelligence",
    "ai",
    "machine-learning",
    "ml",
    "chatbot",
    "gpt",
    "llm",
    "generative-ai",
    "agent",
];

// "dex " keeps its trailing space so "index" and "dexterity" stay out.
const DEFI_KEYWORDS: &[&str] = &["defi", "swap", "yield", "liquidity", "amm", "dex ", "lending"];
const DEFI_TOPICS: &[&str] = &["defi", "yield", "swap", "amm", "dex", "lending"];

const WEB3_KEYWORDS: &[&str] = &[
    "web3",
    "blockchain",
    "ethereum",
    "solana",
    "smart contract",
    "nft",
    "crypto",
];
const WEB3_TOPICS: &[&str] = &[
    "web3",
    "blockchain",
    "ethereum",
    "solana",
    "crypto",
    "nft",
    "wallet",
];

const INFRA_KEYWORDS: &[&str] = &[
    "kubernetes",
    " k8s",
    "docker",
    "infrastructure",
    "monitoring",
    "observability",
];
const CONTAINER_LANGUAGE: &str = "dockerfile";

const DEVTOOL_KEYWORDS: &[&str] = &["developer tool", "cli tool", "code editor", "devtool"];
const DEVTOOL_TOPICS: &[&str] = &[
    "developer-tools",
    "developer",
    "api",
    "sdk",
    "open-source",
    "github",
];

/// Lowercased classification inputs.
pub struct Signals {
    text: String,
    topics: HashSet<String>,
    language: String,
}

impl Signals {
    pub fn new(text: &str, topics: &[String], language: Option<&str>) -> Self {
        Signals {
            text: text.to_lowercase(),
            topics: topics.iter().map(|t| t.to_lowercase()).collect(),
            language: language.unwrap_or_default().to_lowercase(),
        }
    }

    fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.text.contains(kw))
    }

    fn tagged_any(&self, topics: &[&str]) -> bool {
        topics.iter().any(|t| self.topics.contains(*t))
    }
}

fn is_mcp(s: &Signals) -> bool {
    s.text.contains("mcp") || s.text.contains("model context protocol") || s.topics.contains("mcp")
}

fn is_ai(s: &Signals) -> bool {
    s.mentions_any(AI_KEYWORDS)
        || s.text.contains(" ai ")
        || s.text.starts_with("ai ")
        || s.tagged_any(AI_TOPICS)
}

fn is_defi(s: &Signals) -> bool {
    s.mentions_any(DEFI_KEYWORDS) || s.tagged_any(DEFI_TOPICS)
}

fn is_web3(s: &Signals) -> bool {
    s.mentions_any(WEB3_KEYWORDS) || s.tagged_any(WEB3_TOPICS)
}

fn is_infra(s: &Signals) -> bool {
    s.language == CONTAINER_LANGUAGE || s.mentions_any(INFRA_KEYWORDS)
}

fn is_devtool(s: &Signals) -> bool {
    s.tagged_any(DEVTOOL_TOPICS) || s.mentions_any(DEVTOOL_KEYWORDS)
}

type Rule = (fn(&Signals) -> bool, Category);

/// Priority order matters: DeFi must precede web3, MCP precedes everything.
pub const CASCADE: &[Rule] = &[
    (is_mcp, Category::McpServer),
    (is_ai, Category::AiAgent),
    (is_defi, Category::DefiTool),
    (is_web3, Category::Web3Tool),
    (is_infra, Category::Infra),
    (is_devtool, Category::DeveloperTool),
];

pub const FALLBACK: Category = Category::Framework;

pub fn classify(signals: &Signals) -> Category {
    CASCADE
        .iter()
        .find(|(matches, _)| matches(signals))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK)
}

pub fn categorize(text: &str, topics: &[String], language: Option<&str>) -> Category {
    classify(&Signals::new(text, topics, language))
}

/// Product listings skew commercial: an unmatched item is a SaaS tool, not a framework.
pub fn categorize_producthunt(tagline: &str, topics: &[String]) -> Category {
    remap_fallback(categorize(tagline, topics, None), Category::SaasTool)
}

/// Every item in an AI tool directory is AI-related by construction.
pub fn categorize_ai_directory(name: &str) -> Category {
    remap_fallback(categorize(name, &[], None), Category::AiAgent)
}

fn remap_fallback(category: Category, replacement: Category) -> Category {
    if category == FALLBACK {
        replacement
    } else {
        category
    }
}
