use draftfix_types::Artifact;

const VIOLATION_PREAMBLE: &str = "The following content rules were violated: ";

const REWRITE_DIRECTIVE: &str = "Rewrite the content below so that it complies with tone, safety, \
and locale requirements. Keep the original meaning and return only the rewritten content.";

/// Build the instruction sent to the repair service.
///
/// Layout is fixed: the violated rules (comma-joined, in the order given), the rewrite
/// directive, then the current content verbatim. The artifact id is never included; the
/// instruction goes to an external text-generation call.
pub fn build_repair_prompt(artifact: &Artifact, violations: &[String]) -> String {
    let content = artifact.content();
    let mut out = String::with_capacity(
        VIOLATION_PREAMBLE.len() + REWRITE_DIRECTIVE.len() + content.len() + 64,
    );
    out.push_str(VIOLATION_PREAMBLE);
    out.push_str(&violations.join(", "));
    out.push_str(".\n\n");
    out.push_str(REWRITE_DIRECTIVE);
    out.push_str("\n\nContent:\n");
    out.push_str(content);
    out
}
