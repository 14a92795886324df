/*
Gestoscopio — clasificación de gestos de movimiento con acelerómetro

Bucle de operador sobre stdin:
1. Primera línea: etiqueta entera de la sesión de captura
2. ENTER vacío → captura una ventana (3 s a 100 Hz), guarda y predice
3. 'p' → imprime el CSV de características acumuladas
4. 'c' → vacía el almacén
5. 'l' → cambia la etiqueta de sesión
6. 'q' → salir

Las muestras vienen de una grabación CSV (reproducida a ritmo real); el
driver del sensor físico queda fuera de este binario.

Uso:
    gestoscopio <pesos.bin> <clases.json> <grabacion.csv>
*/

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use gestoscopio::capture::run_window;
use gestoscopio::classifier::GestureClassifier;
use gestoscopio::csv_loader::ReplaySource;
use gestoscopio::scheduler::SystemClock;
use gestoscopio::store::FeatureStore;
use gestoscopio::types::FeatureRow;

/// Estados del bucle de operador (sin bloqueo de cabeza de línea: cada
/// línea de stdin se interpreta según el estado actual)
#[derive(Clone, Copy)]
enum OperatorState {
    AwaitingLabel,
    Recording { label: i32 },
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        bail!("Uso: gestoscopio <pesos.bin> <clases.json> <grabacion.csv>");
    }

    let classifier = GestureClassifier::new(&args[1], &args[2])
        .with_context(|| format!("No se pudo cargar el modelo desde {}", args[1]))?;
    println!("[MODELO] Pesos cargados: {}", args[1]);
    println!("[MODELO] Etiquetas: {:?}", classifier.labels());

    let mut source = ReplaySource::from_csv(&args[3])
        .with_context(|| format!("No se pudo cargar la grabación {}", args[3]))?;
    println!("[SENSOR] Grabación: {} ({} muestras)\n", args[3], source.len());

    let mut store = FeatureStore::new();
    let mut state = OperatorState::AwaitingLabel;

    println!("Introduce la etiqueta de movimiento (entero):");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = line.trim();

        match state {
            OperatorState::AwaitingLabel => match cmd.parse::<i32>() {
                Ok(label) => {
                    println!("Etiqueta activa: {}", label);
                    print_menu();
                    state = OperatorState::Recording { label };
                }
                Err(_) => println!("Etiqueta inválida, introduce un entero:"),
            },

            OperatorState::Recording { label } => match cmd {
                "" => {
                    println!("Grabando ventana de 3 s...");
                    io::stdout().flush()?;

                    let clock = SystemClock::new();
                    match run_window(&clock, &mut source) {
                        Ok(features) => {
                            if let Err(e) = store.push(FeatureRow { label, features }) {
                                println!("⚠️  {}", e);
                            } else {
                                println!("Captura {} guardada", store.len());
                            }

                            let prediction = classifier.predict(&features)?;
                            println!(
                                "🎯 Clase {} (etiqueta {}) — probabilidades {:?}",
                                prediction.class_index, prediction.label, prediction.probabilities
                            );
                        }
                        Err(e) => println!("❌ Captura fallida: {}", e),
                    }
                }
                "p" => {
                    print!("{}", store.to_csv());
                    println!("---END---");
                }
                "c" => {
                    store.clear();
                    println!("Almacén vaciado.");
                }
                "l" => {
                    println!("Introduce la nueva etiqueta (entero):");
                    state = OperatorState::AwaitingLabel;
                }
                "q" => break,
                _ => print_menu(),
            },
        }
    }

    Ok(())
}

fn print_menu() {
    println!("ENTER → grabar una ventana");
    println!("'p' + ENTER → imprimir CSV");
    println!("'c' + ENTER → vaciar almacén");
    println!("'l' + ENTER → cambiar etiqueta");
    println!("'q' + ENTER → salir");
}
