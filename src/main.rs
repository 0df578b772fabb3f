// Demo driver for the claim field-extraction engine: reads already-OCR'd
// text (the external recognition step's output), extracts a structured
// claim, and prints a report plus the serialized record.

use chrono::NaiveDate;
use clap::Parser;
use claimlens::models::{DocumentText, ExtractionVocabulary, StructuredClaim, PAGE_BREAK};
use claimlens::ClaimExtractor;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claimlens", about = "Extract a structured claim from OCR text of a scanned claim form")]
struct Args {
    /// Text file with OCR output; pages are separated by a form feed
    input: PathBuf,

    /// Reference date for age-from-DOB computation (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    reference_date: Option<NaiveDate>,

    /// JSON file overriding the built-in extraction vocabulary
    #[arg(long, value_name = "FILE")]
    vocabulary: Option<PathBuf>,
}

fn print_report(claim: &StructuredClaim) {
    println!("\n===============================================");
    println!("        STRUCTURED CLAIM EXTRACTION");
    println!("===============================================\n");

    println!("PATIENT:");
    println!("  Patient Name: {}", claim.patient_name.as_deref().unwrap_or("(not found)"));
    println!("  Member Name: {}", claim.member_name.as_deref().unwrap_or("(not found)"));
    match claim.age {
        Some(age) => println!("  Age: {}", age),
        None => println!("  Age: (not found)"),
    }

    println!("\nCLINICAL:");
    if claim.diagnoses.is_empty() {
        println!("  Diagnoses: (not found)");
    } else {
        for d in &claim.diagnoses {
            println!("  Diagnosis: {}", d);
        }
    }
    if claim.procedures.is_empty() {
        println!("  Procedures: (not found)");
    } else {
        for p in &claim.procedures {
            println!("  Procedure: {}", p);
        }
    }
    if claim.medications.is_empty() {
        println!("  Medications: (not found)");
    } else {
        for m in &claim.medications {
            let dosage = match (m.dosage_amount, m.dosage_unit) {
                (Some(amount), Some(unit)) => format!(" {}{}", amount, unit),
                _ => String::new(),
            };
            let quantity = m.quantity.map(|q| format!(" x{}", q)).unwrap_or_default();
            println!("  Medication: {}{}{}", m.name, dosage, quantity);
        }
    }

    println!("\nADMISSION:");
    println!("  Was Admitted: {}", if claim.was_admitted { "yes" } else { "no" });
    println!(
        "  Admission Date: {}",
        claim.admission_date.map(|d| d.to_string()).unwrap_or_else(|| "(not found)".to_string())
    );
    println!(
        "  Discharge Date: {}",
        claim.discharge_date.map(|d| d.to_string()).unwrap_or_else(|| "(not found)".to_string())
    );
    if claim.date_order_conflict {
        println!("  WARNING: discharge date precedes admission date");
    }

    println!("\nBILLING:");
    println!(
        "  Total Amount: {}",
        claim.total_amount.map(|a| a.to_string()).unwrap_or_else(|| "(not found)".to_string())
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let raw = fs::read_to_string(&args.input)?;
    let pages: Vec<String> = raw.split(PAGE_BREAK).map(str::to_string).collect();

    let mut extractor = match &args.vocabulary {
        Some(path) => {
            let vocab = ExtractionVocabulary::from_json(&fs::read_to_string(path)?)?;
            ClaimExtractor::with_vocabulary(vocab)
        }
        None => ClaimExtractor::new(),
    };
    if let Some(date) = args.reference_date {
        extractor = extractor.with_reference_date(date);
    }

    let claim = extractor.extract(&DocumentText::new(pages))?;
    print_report(&claim);

    println!("\nJSON:");
    println!("{}", serde_json::to_string_pretty(&claim)?);
    Ok(())
}
