use monsoon_report::loader::load_period_or_empty;
use monsoon_report::monsoon::{find_spell, load_spells};
use monsoon_report::{output, reconcile, reports, Config, Month, StatusCategory};
use std::fs;
use tempfile::TempDir;

const JUNE_2024: &str = "\u{feff}S.No,DISTRICT NAME,Actual R/F (mm),Normal R/F (mm),Departure\n\
    1,Patna,120.0,160.0,-25\n\
    2,Gaya,297.0,180.0,65\n\
    3,Araria,NA,200.0,\n\
    4,Supaul,0,150.0,-100\n";

const JUNE_2023: &str = "District,Actual,Normal,Dep (%)\n\
    GAYA,200.0,180.0,11\n\
    SUPAUL,75,150,-50\n\
    KATIHAR,300,250,20\n";

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("june_2024.csv"), JUNE_2024).unwrap();
    fs::write(dir.path().join("june_2023.csv"), JUNE_2023).unwrap();
    fs::write(
        dir.path().join("Onset and Withdrawal of SW monsoon over Bihar.csv"),
        "Year,Date of onset,Date  of   Withdrawal\n2024,20.06.2024,12.10.2024\n",
    )
    .unwrap();
    dir
}

fn config_for(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn compare_two_years_end_to_end() {
    let dir = data_dir();
    let config = config_for(&dir);
    let strategy = config.column_strategy();

    let y1 = load_period_or_empty(&config.monthly_path(2024, Month::June), strategy.as_ref());
    let y2 = load_period_or_empty(&config.monthly_path(2023, Month::June), strategy.as_ref());
    assert_eq!(y1.len(), 4);
    assert_eq!(y2.len(), 3);

    let comparison = reconcile(&y1, &y2);
    let names: Vec<&str> = comparison.iter().map(|r| r.district.as_str()).collect();
    assert_eq!(names, vec!["ARARIA", "GAYA", "PATNA", "SUPAUL"]);

    let gaya = &comparison[1];
    assert_eq!(gaya.status1, StatusCategory::LargeExcess);
    assert_eq!(gaya.difference, 97.0);
    assert!(gaya.matched);

    let patna = &comparison[2];
    assert_eq!(patna.status1, StatusCategory::Deficient);
    assert_eq!(patna.actual2, 0.0);
    assert_eq!(patna.status2, StatusCategory::Missing);
    assert!(!patna.matched);

    let supaul = &comparison[3];
    assert_eq!(supaul.status1, StatusCategory::NoRain);
    assert_eq!(supaul.status2, StatusCategory::Deficient);
    assert_eq!(supaul.difference, -75.0);

    let araria = &comparison[0];
    assert_eq!(araria.status1, StatusCategory::Missing);

    let out = dir.path().join("comparison.csv");
    output::write_csv(&out, &reports::comparison_rows(&comparison)).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("PATNA,120.0,0.0,+120.0,DEFICIENT (-25%),MISSING (N/A)"));
}

#[test]
fn missing_second_year_still_reports_every_district() {
    let dir = data_dir();
    let config = config_for(&dir);
    let strategy = config.column_strategy();

    let y1 = load_period_or_empty(&config.monthly_path(2024, Month::June), strategy.as_ref());
    let y2 = load_period_or_empty(&config.monthly_path(2019, Month::June), strategy.as_ref());
    assert!(y2.is_empty());

    let comparison = reconcile(&y1, &y2);
    assert_eq!(comparison.len(), y1.len());
    assert!(comparison.iter().all(|r| r.status2 == StatusCategory::Missing));
    assert_eq!(reports::summarize_comparison(&comparison).matched_districts, 0);
}

#[test]
fn period_summary_to_json() {
    let dir = data_dir();
    let config = config_for(&dir);
    let records = load_period_or_empty(
        &config.monthly_path(2024, Month::June),
        config.column_strategy().as_ref(),
    );
    let summary = reports::summarize_period(&records);
    assert_eq!(summary.reporting_districts, 3);
    assert_eq!(summary.wettest_district.as_deref(), Some("GAYA"));

    let path = dir.path().join("summary.json");
    output::write_json(&path, &summary).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["status_counts"]["LARGE_EXCESS"], 1);
    assert_eq!(value["status_counts"]["MISSING"], 1);
    assert_eq!(value["total_districts"], 4);
}

#[test]
fn monsoon_calendar_from_data_dir() {
    let dir = data_dir();
    let config = config_for(&dir);
    let spells = load_spells(&config.monsoon_path()).unwrap();
    let spell = find_spell(&spells, 2024).unwrap();
    assert_eq!(spell.stay_days(), 114);
}
