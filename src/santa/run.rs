use rand::Rng;
use std::path::PathBuf;

use crate::config::GenerateArgs;
use crate::display::{format_assignments_csv, write_assignments_to_file};
use crate::error::SantaResult;
use crate::parser::UploadedFile;
use crate::records::{parse_employees, parse_previous_assignments, Employee};
use crate::validation::{validate_employee_file, validate_previous_file};
use super::constraints::build_forbidden_index;
use super::derangement::build_derangement;
use super::types::{Assignment, ForbiddenIndex};

/// Everything one draw produced. Lives only as long as the run.
#[derive(Debug, Clone)]
pub struct SecretSantaRun {
    pub employees: Vec<Employee>,
    pub forbidden: ForbiddenIndex,
    pub assignment: Assignment,
    pub csv: String,
}

/// Full pipeline: read, validate, parse, constrain, draw, render.
///
/// Both files are validated before anything else happens, so a bad
/// previous-round file is reported without wasting a draw.
pub fn build_secret_santa<R: Rng + ?Sized>(
    employees_file: &UploadedFile,
    previous_file: Option<&UploadedFile>,
    rng: &mut R,
) -> SantaResult<SecretSantaRun> {
    draw(employees_file, previous_file, rng).map_err(|e| {
        log::warn!("secret santa run rejected ({}): {}", e.kind(), e);
        e
    })
}

fn draw<R: Rng + ?Sized>(
    employees_file: &UploadedFile,
    previous_file: Option<&UploadedFile>,
    rng: &mut R,
) -> SantaResult<SecretSantaRun> {
    let employee_table = validate_employee_file(employees_file)?;
    let previous_table = previous_file.map(validate_previous_file).transpose()?;

    let employees = parse_employees(&employee_table)?;
    let previous = previous_table
        .as_ref()
        .map(parse_previous_assignments)
        .transpose()?;

    let forbidden = build_forbidden_index(&employees, previous.as_deref());
    let assignment = build_derangement(&forbidden, rng)?;
    let csv = format_assignments_csv(&employees, &assignment)?;

    log::info!(
        "drew {} participant(s), {} repeat pairing(s) excluded",
        employees.len(),
        forbidden.constrained_count()
    );

    Ok(SecretSantaRun {
        employees,
        forbidden,
        assignment,
        csv,
    })
}

/// Same as [`build_secret_santa`] but only returns the CSV text.
pub fn build_secret_santa_csv<R: Rng + ?Sized>(
    employees_file: &UploadedFile,
    previous_file: Option<&UploadedFile>,
    rng: &mut R,
) -> SantaResult<String> {
    build_secret_santa(employees_file, previous_file, rng).map(|run| run.csv)
}

/// Command-line `generate`: reads the files named in `args`, draws, and
/// writes the CSV to the output path.
pub fn generate_to_file(args: &GenerateArgs) -> SantaResult<(SecretSantaRun, PathBuf)> {
    let employees = UploadedFile::from_path(&args.employees)?;
    let previous = args
        .previous
        .as_ref()
        .map(UploadedFile::from_path)
        .transpose()?;

    let run = match args.seed {
        Some(seed) => {
            use rand::SeedableRng;
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            build_secret_santa(&employees, previous.as_ref(), &mut rng)?
        }
        None => build_secret_santa(&employees, previous.as_ref(), &mut rand::thread_rng())?,
    };

    write_assignments_to_file(&run.csv, &args.output)?;
    Ok((run, args.output.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SantaError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    fn csv(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec())
    }

    const EMPLOYEES: &str = "Employee_Name,Employee_EmailID\n\
                             Alice,alice@x.com\n\
                             Bob,bob@x.com\n\
                             Carol,carol@x.com\n\
                             Dan,dan@x.com\n";

    #[test]
    fn output_has_one_line_per_employee_in_roster_order() {
        let run = build_secret_santa(
            &csv("staff.csv", EMPLOYEES),
            None,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();

        let lines: Vec<&str> = run.csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Alice,alice@x.com,"));
        assert!(lines[4].starts_with("Dan,dan@x.com,"));

        let mut children: Vec<&str> = lines[1..]
            .iter()
            .map(|line| line.rsplit(',').next().unwrap())
            .collect();
        children.sort_unstable();
        assert_eq!(children, vec!["alice@x.com", "bob@x.com", "carol@x.com", "dan@x.com"]);
    }

    #[test]
    fn previous_round_pairings_are_not_repeated() {
        let previous = csv(
            "last-year.csv",
            "Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID\n\
             Alice,alice@x.com,Bob,bob@x.com\n\
             Bob,bob@x.com,Carol,carol@x.com\n\
             Carol,carol@x.com,Dan,dan@x.com\n\
             Dan,dan@x.com,Alice,alice@x.com\n\
             Eve,eve@x.com,Alice,alice@x.com\n",
        );

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let run =
                build_secret_santa(&csv("staff.csv", EMPLOYEES), Some(&previous), &mut rng).unwrap();
            assert_eq!(run.forbidden.constrained_count(), 4);
            for (giver, recipient) in run.assignment.pairs() {
                assert_ne!(recipient, (giver + 1) % 4);
            }
        }
    }

    #[test]
    fn invalid_previous_file_is_reported_before_employee_parsing() {
        // The employee list is too short, but the previous file's schema
        // problem is what surfaces because validation runs first.
        let employees = csv("staff.csv", "Employee_Name,Employee_EmailID\nAlice,alice@x.com\n");
        let previous = csv("last-year.csv", "Employee_Name,Employee_EmailID\nAlice,alice@x.com\n");

        let err = build_secret_santa(&employees, Some(&previous), &mut rand::thread_rng())
            .unwrap_err();
        assert_eq!(err.kind(), "MissingColumns");
    }

    #[test]
    fn impossible_previous_round_fails_cleanly() {
        let employees = csv(
            "staff.csv",
            "Employee_Name,Employee_EmailID\nA,a@x.com\nB,b@x.com\nC,c@x.com\n",
        );
        // Blocks one edge of each 3-cycle: a→b and b→a.
        let previous = csv(
            "last-year.csv",
            "Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID\n\
             A,a@x.com,B,b@x.com\n\
             B,b@x.com,A,a@x.com\n",
        );

        let err = build_secret_santa_csv(&employees, Some(&previous), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SantaError::DerangementUnsatisfiable { .. }));
    }

    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static LOGGER: CaptureLogger = CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                CAPTURED.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn failed_run_is_logged_at_warn() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        let employees = csv(
            "staff.csv",
            "Employee_Name,Employee_EmailID\nA,dup@x.com\nB,dup@x.com\n",
        );
        let err = build_secret_santa(&employees, None, &mut StdRng::seed_from_u64(4)).unwrap_err();
        assert_eq!(err.kind(), "DuplicateEmail");

        let captured = CAPTURED.lock().unwrap();
        assert!(captured
            .iter()
            .any(|line| line.contains("(DuplicateEmail)") && line.contains("must be unique")));
    }

    #[test]
    fn generate_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let employees = dir.path().join("staff.csv");
        std::fs::write(&employees, EMPLOYEES).unwrap();

        let args = GenerateArgs {
            employees,
            previous: None,
            output: dir.path().join("secret-santa.csv"),
            seed: Some(17),
        };
        let (run, output) = generate_to_file(&args).unwrap();

        assert_eq!(std::fs::read_to_string(output).unwrap(), run.csv);
    }
}
