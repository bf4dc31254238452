// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für ESP32-C6 Embedded Rust

/// Default-Pin der Status-LED, falls nichts gesetzt ist
const DEFAULT_GPIO: &str = "8";
/// Default-Polarität: Active-High
const DEFAULT_ON: &str = "1";

fn main() {
    // Lade .env file für Default-LED Konfiguration
    // Fehler ignorieren wenn .env nicht existiert (dann gelten Defaults)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!(
            "   Nutze STATUS_LED_DEFAULT_GPIO={} und STATUS_LED_DEFAULT_ON={}",
            DEFAULT_GPIO, DEFAULT_ON
        );
    }

    // Gebe LED-Konfiguration an Rust-Compiler weiter
    // Die Werte werden zur Compile-Zeit in den Code eingebacken
    let gpio = std::env::var("STATUS_LED_DEFAULT_GPIO").unwrap_or_else(|_| DEFAULT_GPIO.into());
    let on = std::env::var("STATUS_LED_DEFAULT_ON").unwrap_or_else(|_| DEFAULT_ON.into());
    println!("cargo:rustc-env=STATUS_LED_DEFAULT_GPIO={}", gpio);
    println!("cargo:rustc-env=STATUS_LED_DEFAULT_ON={}", on);
    println!("cargo:rerun-if-env-changed=STATUS_LED_DEFAULT_GPIO");
    println!("cargo:rerun-if-env-changed=STATUS_LED_DEFAULT_ON");

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen (sonst Probleme mit flip-link)
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    // Wenn vom Linker aufgerufen (mit Error-Typ und Symbol-Name)
    if args.len() > 2 {
        let kind = &args[1]; // Fehler-Typ (z.B. "undefined-symbol")
        let what = &args[2]; // Symbol-Name (z.B. "_defmt_...")

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                what if what.starts_with("_defmt_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `defmt` not found - make sure `defmt.x` is added as a linker script and you have included `use esp_println as _;`"
                    );
                    eprintln!();
                }
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                what if what.starts_with("esp_rtos_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `esp-rtos` has not been started. Make sure `esp_rtos::start()` runs before spawning tasks."
                    );
                    eprintln!();
                }
                what if what.starts_with("_critical_section_") => {
                    eprintln!();
                    eprintln!(
                        "💡 No `critical-section` implementation linked - `esp-hal` provides one for the target."
                    );
                    eprintln!();
                }
                _ => (),
            },
            // we don't have anything helpful for "missing-lib" yet
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
