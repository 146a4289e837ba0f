use std::time::Duration;

use crate::helpers::test_app::{error_type, CreatedRoom, GameState, JoinedRoom, RoomSnapshot, TestApp};

async fn room_with_two_players(app: &TestApp) -> (CreatedRoom, JoinedRoom) {
    let created = app.create_room("p1").await;
    let joined = app.join_room_ok(&created.room_code, "p2").await;
    (created, joined)
}

#[tokio::test]
async fn game_cannot_start_with_one_player() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("p1").await;

    let response = app.start_game(&created.room_code).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_type(response).await, "NOT_ENOUGH_PLAYERS");
}

#[tokio::test]
async fn game_starts_with_the_first_player_drawing() {
    let app = TestApp::spawn_app().await;
    let (created, _) = room_with_two_players(&app).await;

    let response = app.start_game(&created.room_code).await;

    assert!(response.status().is_success());
    let state: GameState = response.json().await.unwrap();
    assert_eq!(state.phase, "IN_PROGRESS");
    assert_eq!(state.total_rounds, 2);
    assert_eq!(state.current_round, 1);
    assert_eq!(state.current_drawer_id, Some(created.player_id));
    assert!(state.word.is_some());

    let room: RoomSnapshot = app.get_room(&created.room_code).await.json().await.unwrap();
    assert_eq!(room.status, "PLAYING");
}

#[tokio::test]
async fn game_cannot_start_twice() {
    let app = TestApp::spawn_app().await;
    let (created, _) = room_with_two_players(&app).await;
    assert!(app.start_game(&created.room_code).await.status().is_success());

    let response = app.start_game(&created.room_code).await;

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(error_type(response).await, "GAME_ALREADY_STARTED");
}

#[tokio::test]
async fn players_are_notified_when_the_game_starts() {
    let app = TestApp::spawn_app().await;
    let (created, joined) = room_with_two_players(&app).await;
    let mut p2 = app.open_websocket(&created.room_code, joined.player_id).await;

    app.start_game(&created.room_code).await;

    let state = p2.receive_event("/state").await.unwrap();
    assert_eq!(state["status"], "PLAYING");
    let event = p2.receive_event("/game").await.unwrap();
    assert_eq!(event["type"], "ROUND_STARTED");
    assert_eq!(event["currentRound"], 1);
    assert_eq!(event["currentDrawerId"], created.player_id);
}

#[tokio::test]
async fn correct_guess_scores_and_updates_the_room() {
    let app = TestApp::spawn_app().await;
    let (created, joined) = room_with_two_players(&app).await;
    let mut p1 = app.open_websocket(&created.room_code, created.player_id).await;
    let mut p2 = app.open_websocket(&created.room_code, joined.player_id).await;
    let state: GameState = app
        .start_game(&created.room_code)
        .await
        .json()
        .await
        .unwrap();
    p1.receive_event("/game").await.unwrap();

    p2.send_chat(&state.word.unwrap()).await;

    let chat = p1.receive_event("/chat").await.unwrap();
    assert_eq!(chat["playerId"], joined.player_id);
    let room = p1.receive_event("/state").await.unwrap();
    assert_eq!(room["players"][1]["playerId"], joined.player_id);
    assert_eq!(room["players"][1]["score"], 100);
    assert_eq!(room["players"][0]["score"], 0);
}

#[tokio::test]
async fn only_the_drawer_strokes_are_relayed() {
    let app = TestApp::spawn_app().await;
    let (created, joined) = room_with_two_players(&app).await;
    let mut p1 = app.open_websocket(&created.room_code, created.player_id).await;
    let mut p2 = app.open_websocket(&created.room_code, joined.player_id).await;
    app.start_game(&created.room_code).await;
    p2.receive_event("/game").await.unwrap();

    p2.send_stroke().await;
    p1.send_stroke().await;

    let stroke = p2.receive_event("/draw").await.unwrap();
    assert_eq!(stroke["playerId"], created.player_id);
    assert_eq!(stroke["lineWidth"], 3.0);
}

#[tokio::test]
async fn rounds_time_out_until_the_game_ends() {
    let app = TestApp::spawn_app_with(|config| config.game.round_duration_seconds = 1).await;
    let (created, joined) = room_with_two_players(&app).await;
    let mut p1 = app.open_websocket(&created.room_code, created.player_id).await;
    app.start_game(&created.room_code).await;

    let started = p1.receive_event("/game").await.unwrap();
    assert_eq!(started["type"], "ROUND_STARTED");

    let timeout = p1.receive_event("/game").await.unwrap();
    assert_eq!(timeout["type"], "ROUND_TIMEOUT");
    assert_eq!(timeout["currentRound"], 1);
    assert_eq!(timeout["gameFinished"], false);

    let started = p1.receive_event("/game").await.unwrap();
    assert_eq!(started["type"], "ROUND_STARTED");
    assert_eq!(started["currentRound"], 2);
    assert_eq!(started["currentDrawerId"], joined.player_id);

    let timeout = p1.receive_event("/game").await.unwrap();
    assert_eq!(timeout["type"], "ROUND_TIMEOUT");
    assert_eq!(timeout["gameFinished"], true);

    let mut status = String::new();
    for _ in 0..20 {
        let room: RoomSnapshot = app.get_room(&created.room_code).await.json().await.unwrap();
        status = room.status;
        if status == "WAITING" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(status, "WAITING");
}

#[tokio::test]
async fn websocket_of_an_unknown_player_is_rejected() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("p1").await;

    let mut player = app.open_raw_websocket(&created.room_code, 9999).await;

    assert_eq!(player.receive_error().await.unwrap(), "PLAYER_NOT_FOUND");
    player.receive_close().await.unwrap();
}

#[tokio::test]
async fn bad_message_is_reported_without_closing() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("p1").await;
    let mut player = app.open_websocket(&created.room_code, created.player_id).await;

    player.send_text("{\"type\":\"vote\"}").await;

    assert_eq!(player.receive_error().await.unwrap(), "UNPROCESSABLE_MESSAGE");
    player.send_text("ping").await;
    assert_eq!(player.receive_text().await.unwrap(), "pong");
}

#[tokio::test]
async fn idle_websocket_is_closed() {
    let app = TestApp::spawn_app_with(|config| config.websocket.inactivity_timeout_seconds = 1).await;
    let created = app.create_room("p1").await;
    let mut player = app.open_websocket(&created.room_code, created.player_id).await;
    assert_eq!(app.inactivity_timeout, Duration::from_secs(1));

    player.receive_close().await.unwrap();
}
