// tests/matrix.rs

//! Build-matrix orchestration against fake and loopback build services.

use librw_recipe::matrix::{
    BuildJob, HttpBuildService, JobReceipt, JobStatus, RemoteBuildService, all_succeeded,
};
use librw_recipe::recipe::default_recipe;
use librw_recipe::{
    BuildConfiguration, Error, JobOutcome, MatrixEnv, MatrixStrategy, Orchestrator, Os, Platform,
    Result,
};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use url::Url;

fn matrix_env(pairs: &[(&str, &str)]) -> Result<MatrixEnv> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MatrixEnv::from_lookup(|key| map.get(key).cloned())
}

fn service_env(platform: &str) -> MatrixEnv {
    matrix_env(&[
        ("LIBRW_PLATFORM", platform),
        ("RECIPE_BUILD_SERVICE", "https://builds.example.com/api"),
        ("RECIPE_UPLOAD", "https://packages.example.com/conan"),
        ("RECIPE_LOGIN_USERNAME", "ci"),
        ("RECIPE_PASSWORD", "hunter2"),
    ])
    .unwrap()
}

/// Service that fails every shared-library job
#[derive(Default)]
struct StaticOnlyService {
    seen: Mutex<Vec<BuildJob>>,
}

impl RemoteBuildService for StaticOnlyService {
    fn submit(&self, job: &BuildJob) -> Result<JobReceipt> {
        self.seen.lock().unwrap().push(job.clone());
        if job.configuration.options.shared {
            return Err(Error::RemoteJobFailure("shared builds are broken".to_string()));
        }
        Ok(JobReceipt {
            id: job.package_id[..8].to_string(),
            status: JobStatus::Queued,
            message: None,
        })
    }
}

#[test]
fn test_missing_platform_family_is_fatal() {
    let err = matrix_env(&[("RECIPE_BUILD_SERVICE", "https://builds.example.com")]).unwrap_err();
    assert!(matches!(err, Error::ConfigurationError(_)));
}

#[test]
fn test_single_strategy_uses_requested_platform() {
    let service = Arc::new(StaticOnlyService::default());
    let orchestrator = Orchestrator::new(service_env("ps2"), default_recipe().unwrap(), service.clone());

    let configs = orchestrator.build_matrix(MatrixStrategy::Single);
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].platform(), Platform::Ps2);
    assert!(!configs[0].options.shared);

    let results = orchestrator.submit(&configs).unwrap();
    assert!(all_succeeded(&results));

    let seen = service.seen.lock().unwrap();
    assert_eq!(seen[0].build_requires.len(), 1);
    assert_eq!(seen[0].upload, "https://packages.example.com/conan");
    assert_eq!(
        seen[0].remotes,
        vec!["https://api.bintray.com/conan/bincrafters/public-conan@True@bincrafters"]
    );
}

#[test]
fn test_partial_failure_submits_every_job() {
    let service = Arc::new(StaticOnlyService::default());
    let orchestrator = Orchestrator::new(service_env("gl3"), default_recipe().unwrap(), service.clone());

    let configs = orchestrator.build_matrix(MatrixStrategy::CommonBuilds);
    let results = orchestrator.submit(&configs).unwrap();

    assert_eq!(results.len(), configs.len());
    assert_eq!(service.seen.lock().unwrap().len(), configs.len());
    assert!(!all_succeeded(&results));

    for result in &results {
        assert_eq!(result.package_id, result.configuration.package_id());
        if result.configuration.options.shared {
            assert!(matches!(result.outcome, JobOutcome::Failed { ref reason } if reason.contains("shared")));
        } else {
            assert!(result.outcome.is_success());
        }
    }
}

#[test]
fn test_common_builds_for_direct3d_stay_on_windows() {
    let service = Arc::new(StaticOnlyService::default());
    let orchestrator = Orchestrator::new(service_env("d3d"), default_recipe().unwrap(), service);

    let configs = orchestrator.build_matrix(MatrixStrategy::CommonBuilds);
    assert!(!configs.is_empty());
    assert!(configs.iter().all(|c| c.settings.os == Os::Windows && c.platform() == Platform::D3d));
}

#[test]
fn test_invalid_configuration_is_never_sent() {
    let service = Arc::new(StaticOnlyService::default());
    let orchestrator = Orchestrator::new(service_env("d3d"), default_recipe().unwrap(), service.clone());

    let mut linux = BuildConfiguration::host(Platform::D3d);
    linux.settings.os = Os::Linux;
    let mut windows = linux.clone();
    windows.settings.os = Os::Windows;

    let results = orchestrator.submit(&[linux, windows]).unwrap();
    assert!(matches!(results[0].outcome, JobOutcome::Rejected { .. }));
    assert!(results[1].outcome.is_success());
    assert_eq!(service.seen.lock().unwrap().len(), 1);
}

/// Accept one HTTP request on a loopback port, answer it, and hand back the raw request
fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("http://{}/api", listener.local_addr().unwrap())).unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().unwrap();
            }
            let end = line == "\r\n";
            head.push_str(&line);
            if end {
                break;
            }
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();

        head + &String::from_utf8(request_body).unwrap()
    });

    (url, handle)
}

fn sample_job() -> BuildJob {
    let env = service_env("gl3");
    let orchestrator = Orchestrator::new(
        env,
        default_recipe().unwrap(),
        Arc::new(StaticOnlyService::default()),
    );
    let config = BuildConfiguration::host(Platform::Gl3);
    orchestrator.job_for(&config, "https://packages.example.com/conan")
}

#[test]
fn test_http_service_posts_job_with_basic_auth() {
    let (url, server) = serve_once("200 OK", r#"{"id": "job-7", "status": "queued"}"#);
    let credentials = service_env("gl3").credentials;
    let service = HttpBuildService::new(&url, credentials).unwrap();

    let job = sample_job();
    let receipt = service.submit(&job).unwrap();
    assert_eq!(receipt.id, "job-7");
    assert_eq!(receipt.status, JobStatus::Queued);

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /api/jobs HTTP/1.1"));
    // "ci:hunter2" in base64
    assert!(request.to_ascii_lowercase().contains("authorization: basic y2k6ahvudgvymg=="));
    assert!(request.contains(&job.package_id));
    assert!(request.contains("sdl2/2.0.9@bincrafters/stable"));
}

#[test]
fn test_http_service_error_status() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#);
    let service = HttpBuildService::new(&url, None).unwrap();

    let err = service.submit(&sample_job()).unwrap_err();
    assert!(matches!(err, Error::RemoteJobFailure(ref m) if m.contains("500")));
    server.join().unwrap();
}

#[test]
fn test_http_service_failed_job() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"id": "job-8", "status": "failed", "message": "glew download failed"}"#,
    );
    let service = HttpBuildService::new(&url, None).unwrap();

    let err = service.submit(&sample_job()).unwrap_err();
    assert!(matches!(err, Error::RemoteJobFailure(ref m) if m.contains("glew download failed")));
    server.join().unwrap();
}
