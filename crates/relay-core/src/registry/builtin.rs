//! Built-in backend table
//!
//! Order matters: lookups break ties by position, so more specific
//! providers come before generic ones.

use super::spec::BackendSpec;
use serde_json::json;

pub(super) fn builtin_specs() -> Vec<BackendSpec> {
    vec![
        // Gateways: detected by config name, credential prefix or base URL.
        BackendSpec::gateway("custom", "Custom (OpenAI-compatible)", "OPENAI_API_KEY"),
        BackendSpec::gateway("openrouter", "OpenRouter", "OPENROUTER_API_KEY")
            .with_keywords(&["openrouter"])
            .detect_key_prefix("sk-or-")
            .detect_base_keyword("openrouter")
            .with_default_base_url("https://openrouter.ai/api/v1"),
        BackendSpec::gateway("aihubmix", "AiHubMix", "OPENAI_API_KEY")
            .with_keywords(&["aihubmix"])
            .with_prefix("openai")
            .detect_base_keyword("aihubmix")
            .with_default_base_url("https://aihubmix.com/v1")
            .strip_existing_prefix(),
        BackendSpec::local("vllm", "vLLM/Local", "HOSTED_VLLM_API_KEY")
            .with_keywords(&["vllm"])
            .with_prefix("hosted_vllm"),
        // Standard providers: matched by model identifier.
        BackendSpec::standard("anthropic", "Anthropic", "ANTHROPIC_API_KEY")
            .with_keywords(&["anthropic", "claude"])
            .with_default_base_url("https://api.anthropic.com/v1"),
        BackendSpec::standard("openai", "OpenAI", "OPENAI_API_KEY")
            .with_keywords(&["openai", "gpt"])
            .with_default_base_url("https://api.openai.com/v1")
            .with_override("gpt-5", json!({"temperature": null})),
        BackendSpec::standard("deepseek", "DeepSeek", "DEEPSEEK_API_KEY")
            .with_keywords(&["deepseek"])
            .with_prefix("deepseek")
            .with_skip_prefixes(&["deepseek/"])
            .with_default_base_url("https://api.deepseek.com")
            .with_override("deepseek-reasoner", json!({"temperature": null})),
        BackendSpec::standard("gemini", "Gemini", "GEMINI_API_KEY")
            .with_keywords(&["gemini"])
            .with_prefix("gemini")
            .with_skip_prefixes(&["gemini/"])
            .with_default_base_url("https://generativelanguage.googleapis.com/v1beta/openai"),
        BackendSpec::standard("zhipu", "Zhipu AI", "ZAI_API_KEY")
            .with_keywords(&["zhipu", "glm", "zai"])
            .with_prefix("zai")
            .with_skip_prefixes(&["zhipu/", "zai/", "openrouter/", "hosted_vllm/"])
            .with_default_base_url("https://open.bigmodel.cn/api/paas/v4")
            .with_env_extras(&[("ZHIPUAI_API_KEY", "{api_key}")]),
        BackendSpec::standard("dashscope", "DashScope", "DASHSCOPE_API_KEY")
            .with_keywords(&["qwen", "dashscope"])
            .with_prefix("dashscope")
            .with_skip_prefixes(&["dashscope/", "openrouter/"])
            .with_default_base_url("https://dashscope.aliyuncs.com/compatible-mode/v1"),
        BackendSpec::standard("moonshot", "Moonshot", "MOONSHOT_API_KEY")
            .with_keywords(&["moonshot", "kimi"])
            .with_prefix("moonshot")
            .with_skip_prefixes(&["moonshot/", "openrouter/"])
            .with_env_extras(&[("MOONSHOT_API_BASE", "{api_base}")])
            .with_default_base_url("https://api.moonshot.ai/v1")
            .with_override("kimi-k2.5", json!({"temperature": 1.0})),
        BackendSpec::standard("minimax", "MiniMax", "MINIMAX_API_KEY")
            .with_keywords(&["minimax"])
            .with_prefix("minimax")
            .with_skip_prefixes(&["minimax/", "openrouter/"])
            .with_default_base_url("https://api.minimax.io/v1"),
        BackendSpec::standard("groq", "Groq", "GROQ_API_KEY")
            .with_keywords(&["groq"])
            .with_prefix("groq")
            .with_skip_prefixes(&["groq/"])
            .with_default_base_url("https://api.groq.com/openai/v1"),
    ]
}
