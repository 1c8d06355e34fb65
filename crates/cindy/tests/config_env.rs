use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

use cindy::config::DATA_DIR_ENV;
use cindy::Config;

#[test]
#[serial]
fn test_data_dir_env_overrides_config() {
  let temp_dir = TempDir::new().unwrap();
  let config = Config { data_dir: Some(PathBuf::from("/nonexistent/cindy")), ..Config::default() };

  env::set_var(DATA_DIR_ENV, temp_dir.path());
  assert_eq!(config.data_dir(), temp_dir.path());
  assert_eq!(config.model_path(), temp_dir.path().join("model.json"));
  env::remove_var(DATA_DIR_ENV);

  assert_eq!(config.data_dir(), PathBuf::from("/nonexistent/cindy"));
  assert_eq!(config.interactions_path(), PathBuf::from("/nonexistent/cindy/interactions.jsonl"));
}

#[test]
#[serial]
fn test_default_data_dir_is_under_home() {
  env::remove_var(DATA_DIR_ENV);
  let config = Config::default();
  if let Some(home) = dirs::home_dir() {
    assert_eq!(config.data_dir(), home.join(".cindy"));
  }
}

#[test]
#[serial]
fn test_load_without_files_uses_defaults() {
  let temp_dir = TempDir::new().unwrap();
  let original = env::current_dir().unwrap();
  let original_home = env::var_os("HOME");

  env::set_current_dir(temp_dir.path()).unwrap();
  env::set_var("HOME", temp_dir.path());
  let config = Config::load(None).unwrap();
  env::set_current_dir(original).unwrap();
  match original_home {
    Some(home) => env::set_var("HOME", home),
    None => env::remove_var("HOME"),
  }

  assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_load_picks_up_local_file() {
  let temp_dir = TempDir::new().unwrap();
  std::fs::write(temp_dir.path().join(".cindy.json"), r#"{"agent_name": "Iris"}"#).unwrap();
  let original = env::current_dir().unwrap();

  env::set_current_dir(temp_dir.path()).unwrap();
  let config = Config::load(None);
  env::set_current_dir(original).unwrap();

  assert_eq!(config.unwrap().agent_name, "Iris");
}
