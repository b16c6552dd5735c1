use esp_idf_svc::hal::delay::FreeRtos;
use log::{error, info, warn};

use atoms3r_camera::core::{loop_delay_ms, AppConfig, CaptureService, HealthAction};
use atoms3r_camera::hardware::camera::{DeviceConfig, EspCameraDriver, FrameCaptureManager};
use atoms3r_camera::hardware::EspIdfBoard;

/// アプリケーションのメインエントリーポイント
fn main() -> anyhow::Result<()> {
    // ESP-IDFの基本初期化
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("atoms3r-camera v{}", atoms3r_camera::VERSION);

    // 設定ファイル読み込み
    let app_config = AppConfig::load().map_err(|e| {
        error!("設定ファイルの読み込みに失敗しました: {}", e);
        anyhow::anyhow!("設定ファイルの読み込みエラー: {}", e)
    })?;

    // カメラ初期化（失敗はデバイスとして致命的）
    let mut board = EspIdfBoard;
    let manager = FrameCaptureManager::init(
        EspCameraDriver::new(),
        &mut board,
        DeviceConfig::ATOMS3R_GC0308,
    )
    .map_err(|e| {
        error!("カメラ初期化に失敗しました: {}", e);
        anyhow::anyhow!("カメラ初期化エラー: {}", e)
    })?;

    let mut service = CaptureService::new(manager, &app_config);

    if let Some(frames) = app_config.warmup_frames {
        let captured = service.warm_up(frames);
        if captured < frames {
            warn!("ウォームアップ中に{}フレーム取得できませんでした", frames - captured);
        }
    }

    info!(
        "キャプチャループを開始します (interval={}ms)",
        app_config.capture_interval_ms
    );
    let delay_ms = loop_delay_ms(app_config.capture_interval_ms);
    loop {
        // フレームの転送先はこのクレートの範囲外。ここではサイズだけ確認する
        let action = service.run_cycle(|frame| {
            if frame.is_empty() {
                warn!("空のフレームを受信しました");
            }
        });
        if action == HealthAction::Restart {
            break;
        }
        FreeRtos::delay_ms(delay_ms);
    }

    error!("キャプチャ失敗が続いたため再起動します ({})", service.stats());
    // マネージャを drop してバッファ返却と esp_camera_deinit を済ませる
    drop(service);
    unsafe { esp_idf_svc::sys::esp_restart() }
}
