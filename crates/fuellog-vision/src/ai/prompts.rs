//! Prompt sent with every scanned photo

/// Ask for a single JSON object describing the photo
pub fn build_scan_prompt() -> String {
    r#"This photo shows either a fuel pump display or a vehicle odometer.

Read the numbers exactly as displayed. Do not guess values that are not visible.

If it is a fuel pump display, answer:
{"type": "pump", "gallons": <volume dispensed>, "pricePerGallon": <price per unit>, "totalCost": <amount due>}

If it is an odometer, answer with the total distance reading (not a trip meter):
{"type": "odometer", "odometer": <reading>}

If it is neither, or nothing is legible, answer:
{"type": "unknown"}

Use null for any value you cannot read. Numbers only, no units or currency symbols.
Answer with the JSON object only."#
        .to_string()
}
