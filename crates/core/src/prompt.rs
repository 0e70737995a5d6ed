use crate::types::{DebugRequest, Dialect, GenerationRequest};

/// Build the free-form prompt for contract generation.
///
/// Interpolates the user's description and the dialect-specific
/// compatibility instruction into a fixed template. Pure and total; the
/// dialect is the only branch.
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let dialect_instruction = match request.dialect {
        Dialect::Legacy => {
            "The contract should be compatible with the SmartPy legacy IDE (e.g., using `sp.TAddress` instead of `sp.address`, and `sp.set_type_expr` for complex types)."
        }
        Dialect::Modern => {
            "The contract should be compatible with the modern SmartPy IDE (e.g., using `sp.address`)."
        }
    };

    format!(
        r#"Generate a SmartPy contract. Description: {description}

{dialect_instruction}

Your response MUST be a single, valid Python code block representing the SmartPy contract.
- Include necessary imports (sp, sp.utils, sp.io).
- Define the contract storage with appropriate initial values.
- Implement all specified entry points with their logic.
- Infer appropriate input parameters and their types from the description.
- If the description implies roles like an 'administrator', set it in the storage during initialization (e.g., self.data.administrator = sp.sender).
- Use sp.failwith for basic error conditions (e.g., unauthorized access, insufficient balance).
- Include a simple test scenario using @sp.add_test that demonstrates the core functionality.
- Do NOT include any explanations, markdown formatting like ```python or ```, or any text other than the Python code itself. The output should be ready to be saved directly into a .py file."#,
        description = request.description,
        dialect_instruction = dialect_instruction,
    )
}

/// Build the structured-output prompt for contract debugging.
///
/// Embeds the failing code and the error message in fenced blocks and asks
/// for a JSON object matching the declared response schema.
pub fn build_debug_prompt(request: &DebugRequest) -> String {
    let dialect_context = match request.dialect {
        Dialect::Legacy => "The user is working with the legacy SmartPy IDE.",
        Dialect::Modern => "The user is working with the modern SmartPy IDE.",
    };

    format!(
        r#"You are an expert SmartPy developer and debugger. A user has provided a SmartPy contract that is failing.
{dialect_context}

Your task is to analyze the contract code and the accompanying error message.
1.  Provide a clear, concise explanation of what is causing the error. Explain the concept behind the error if necessary.
2.  Provide the fully corrected SmartPy contract code.

**User's Erroneous Code:**
```python
{contract_code}
```

**Error Message Received:**
```
{error_message}
```

Respond with a JSON object that follows the specified schema."#,
        dialect_context = dialect_context,
        contract_code = request.contract_code,
        error_message = request.error_message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation_request(description: &str, dialect: Dialect) -> GenerationRequest {
        GenerationRequest {
            description: description.to_string(),
            dialect,
        }
    }

    fn debug_request(code: &str, error: &str, dialect: Dialect) -> DebugRequest {
        DebugRequest {
            contract_code: code.to_string(),
            error_message: error.to_string(),
            dialect,
        }
    }

    #[test]
    fn test_generation_prompt_contains_description_verbatim() {
        let request = generation_request(
            "A voting contract where only registered members can vote.",
            Dialect::Modern,
        );

        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains("A voting contract where only registered members can vote."));
    }

    #[test]
    fn test_generation_prompt_modern_dialect_phrasing() {
        let request = generation_request("token contract with mint", Dialect::Modern);

        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains("sp.address"));
        assert!(!prompt.contains("sp.TAddress"));
        assert!(prompt.contains("compatible with the modern SmartPy IDE"));
    }

    #[test]
    fn test_generation_prompt_legacy_dialect_phrasing() {
        let request = generation_request("token contract with mint", Dialect::Legacy);

        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains("sp.TAddress"));
        assert!(prompt.contains("sp.set_type_expr"));
        assert!(!prompt.contains("compatible with the modern SmartPy IDE"));
    }

    #[test]
    fn test_generation_prompt_fixed_requirements() {
        let request = generation_request("an escrow contract", Dialect::Modern);

        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains("Include necessary imports (sp, sp.utils, sp.io)."));
        assert!(prompt.contains("self.data.administrator = sp.sender"));
        assert!(prompt.contains("sp.failwith"));
        assert!(prompt.contains("@sp.add_test"));
        assert!(prompt.contains("Do NOT include any explanations"));
    }

    #[test]
    fn test_debug_prompt_embeds_code_and_error_in_fences() {
        let request = debug_request(
            "import smartpy as sp\n\nclass Token(sp.Contract):\n    pass",
            "AttributeError: 'Token' object has no attribute 'data'",
            Dialect::Modern,
        );

        let prompt = build_debug_prompt(&request);
        assert!(prompt.contains(
            "```python\nimport smartpy as sp\n\nclass Token(sp.Contract):\n    pass\n```"
        ));
        assert!(prompt
            .contains("```\nAttributeError: 'Token' object has no attribute 'data'\n```"));
    }

    #[test]
    fn test_debug_prompt_dialect_context() {
        let modern = build_debug_prompt(&debug_request("code", "error", Dialect::Modern));
        assert!(modern.contains("The user is working with the modern SmartPy IDE."));
        assert!(!modern.contains("legacy SmartPy IDE"));

        let legacy = build_debug_prompt(&debug_request("code", "error", Dialect::Legacy));
        assert!(legacy.contains("The user is working with the legacy SmartPy IDE."));
        assert!(!legacy.contains("modern SmartPy IDE"));
    }

    #[test]
    fn test_debug_prompt_requests_schema_json() {
        let prompt = build_debug_prompt(&debug_request("code", "error", Dialect::Modern));
        assert!(prompt.contains("Respond with a JSON object that follows the specified schema."));
    }

    #[test]
    fn test_special_characters_survive_interpolation() {
        let request = generation_request(r#"A contract storing "quoted" {braced} text"#, Dialect::Modern);

        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains(r#"A contract storing "quoted" {braced} text"#));
    }
}
