use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::context::ReferenceContext;

pub const REFERENCE_START: &str = "===== REFERENCE NOTES START =====";
pub const REFERENCE_END: &str = "===== REFERENCE NOTES END =====";

/// Behavioral contract handed to the completion engine before any user content.
pub const SYSTEM_TEMPLATE: &str = r#"You are "Pitstop", an automotive repair assistant.

[ROLE]
- From the vehicle details the user gives (make, model, year, fuel type, mileage)
  and the symptom or part they describe, explain:
  1) Symptom interpretation: the likely causes of what they are experiencing
  2) Likely repair items: part names and the work involved
  3) Cost-range estimate: parts and labour separately when possible
  4) Follow-up checks: what else is worth inspecting, and whether it is safe
     to keep driving or the car should go to a shop right away
- The reference notes below may contain model-specific known faults, labour
  rates and part prices. When they apply, prefer them over general knowledge.
- When you do not know an exact price, give a range such as
  "roughly 150 to 300 dollars".

[STYLE]
- Always answer in a polite, formal register.
- Organise the key information as the numbered list above.
- If the description is too vague, first ask 2 to 4 short questions
  (model and year, mileage, usual driving conditions, warning lights, ...).
- Briefly state that the figures are reference estimates, not a final quote
  from a repair shop.

[SAFETY]
- Whenever the symptom involves brakes, steering, tires, or an engine or
  transmission warning light, always finish with:
  "Please visit a repair shop or service center as soon as possible."

The section below holds additional reference notes."#;

/// The composed system instruction. Built once per process and shared
/// read-only; clones point at the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction(Arc<str>);

impl SystemInstruction {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SystemInstruction {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Appends the reference context, unaltered, between the delimiter lines.
pub fn compose(template: &str, reference: &ReferenceContext) -> SystemInstruction {
    let mut instruction = String::with_capacity(
        template.len() + reference.len() + REFERENCE_START.len() + REFERENCE_END.len() + 8,
    );

    instruction.push_str(template);
    instruction.push_str("\n\n");
    instruction.push_str(REFERENCE_START);
    instruction.push('\n');
    instruction.push_str(reference.as_str());
    instruction.push('\n');
    instruction.push_str(REFERENCE_END);
    instruction.push('\n');

    SystemInstruction(Arc::from(instruction))
}

pub struct PromptBuilder {
    template: &'static str,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            template: SYSTEM_TEMPLATE,
        }
    }

    pub fn build_system_instruction(&self, reference: &ReferenceContext) -> SystemInstruction {
        compose(self.template, reference)
    }
}
