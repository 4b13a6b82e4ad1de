use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_input() -> PathBuf {
    PathBuf::from("sample.json")
}

pub fn default_output() -> PathBuf {
    PathBuf::from("sample_output_contradiction.json")
}

pub fn default_result_field() -> String {
    "agent_response".to_string()
}

pub fn default_debug_log() -> Option<PathBuf> {
    Some(PathBuf::from("agent_debug.log"))
}

pub fn default_concurrency() -> usize {
    1
}

pub fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub fn default_agent_name() -> String {
    "ExtractorAgent".to_string()
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    2000
}

pub fn default_system_message() -> String {
    "You are a research scientist. \
     Always respond using the JSON format exactly as specified. \
     If no contradictions are found between any two reviews, output [] (an empty JSON list)."
        .to_string()
}

pub fn default_instructions() -> String {
    concat!(
        "Step 1: Read and analyze the following academic paper reviews pairwise.\n",
        "Step 2: Identify any contradictions between two specific reviews. A contradiction means that a statement in one review directly conflicts with a statement in another review.\n",
        "Step 3: Before giving your final answer, reason through all contradictions step-by-step while strictly referring to the definitions provided below. DO NOT include any of this reasoning in your final output.\n",
        "Step 4: Use the following definitions to determine the relevant aspect for each contradiction:\n",
        "    - Substance: The paper lacks substantial experiments or detailed analyses (e.g., insufficient experiments, poor result analysis, missing ablation studies).\n",
        "    - Motivation: The paper fails to address an important problem or its significance is questionable.\n",
        "    - Clarity: The paper is poorly written, unorganized, or unclear about its contributions and methodology.\n",
        "    - Meaningful comparison: The paper does not fairly compare its methods with prior work or omits necessary comparative analysis.\n",
        "    - Originality: The paper does not offer new research topics, techniques, or insights, or its contributions are incremental.\n",
        "    - Soundness: The paper's methodology or claims are not convincingly supported or are logically inconsistent.\n",
        "    - Replicability: The paper does not provide sufficient details, data, or code for others to reproduce its results.\n",
        "Step 5: For each pair of reviews (e.g., Review 1 vs Review 2) that contain a contradiction:\n",
        "    - Summarize the contradiction concisely in a field called 'contradiction_statement'.\n",
        "    - Specify the most relevant aspect in a field called 'identified_aspect'. Choose exactly one from: Substance, Motivation, Clarity, Meaningful comparison, Originality, Soundness, or Replicability.\n",
        "    - Quote the exact complete sentences from each review that illustrate the contradiction in a field called 'evidence', formatted as: 'Review X: [complete sentence]. Review Y: [complete sentence].' Do not paraphrase.\n",
        "    - Provide an 'aspect_score' (an integer from 1 to 5) reflecting how strongly the contradiction pertains to the identified aspect (5 = very severe).\n",
        "    - Provide an 'evidence_score' (an integer from 1 to 5) reflecting how clear and convincing the evidence is (5 = very clear).\n",
        "Step 6: If no contradictions are found between any pair of reviews, respond with an empty JSON list: [].\n",
        "Step 7: Respond ONLY with a JSON list containing your final answers.",
    )
    .to_string()
}
