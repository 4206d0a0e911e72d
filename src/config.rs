/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 发票 PDF 存放目录（未通过命令行指定路径时扫描该目录）
    pub invoice_folder: String,
    /// CSV 输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// LLM 响应的最大 token 数
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            invoice_folder: "invoices".to_string(),
            output_dir: ".".to_string(),
            verbose_logging: false,
            // LM Studio 本地服务不校验 api key，但客户端要求非空
            llm_api_key: "lm-studio".to_string(),
            llm_api_base_url: "http://localhost:1234/v1".to_string(),
            llm_model_name: "local-model".to_string(),
            llm_max_tokens: 2048,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            invoice_folder: std::env::var("INVOICE_FOLDER").unwrap_or(default.invoice_folder),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
        }
    }
}
